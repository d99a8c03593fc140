//! CLI argument parsing for diskcheck.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "diskcheck")]
#[command(version, about = "Check that a drive or server share has enough free disk space")]
#[command(long_about = "Check that a drive or server share has enough free disk space.\n\n\
    PARAMETERS uses the checker syntax:\n  \
    share-or-drive-letter|min-free-space(MB)[|timeout-ms[|max-attempts[|fail-on-unresolved]]]\n\n\
    Examples:\n  diskcheck 'D|20184|100|3'\n  diskcheck '\\\\DataServer\\c$|100000|100|3'")]
pub struct Cli {
    /// Checker parameter string
    pub parameters: String,

    /// Settings file (TOML); falls back to $DISKCHECK_CONFIG
    #[arg(long, env = "DISKCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tree name handed to the checker
    #[arg(long, default_value = "MainTree")]
    pub tree: String,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not print progress percentages
    #[arg(short, long)]
    pub quiet: bool,
}
