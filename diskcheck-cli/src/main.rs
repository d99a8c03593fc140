use anyhow::Result;
use clap::Parser;
use diskcheck_core::{
    CheckOutcome, DiskSpaceChecker, DiskSpaceReport, NodeChecker, TreeEvent, TreeParameters,
    Verdict,
};
use std::process::ExitCode;

mod cli;
mod config;
mod logging;

/// Exit status when the check could not be carried out at all.
const EXIT_ABORTED: u8 = 3;

fn exit_status(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 1,
        Verdict::Indeterminate => 2,
    }
}

/// Progress lines would corrupt the JSON document on stdout.
fn shows_progress(cli: &cli::Cli) -> bool {
    !cli.quiet && !cli.json
}

fn render(verdict: Verdict, report: DiskSpaceReport, json: bool) -> Result<String> {
    if json {
        let outcome = CheckOutcome { verdict, report };
        return Ok(serde_json::to_string_pretty(&outcome)?);
    }
    Ok(format!("{} - {}", verdict, report))
}

fn run(cli: &cli::Cli) -> Result<Verdict> {
    let settings = config::load_settings(cli.config.as_deref())?;
    let hal = settings.system_hal();
    let mut checker = DiskSpaceChecker::with_settings(hal, settings);

    let tree = TreeParameters::new(cli.tree.clone(), None);
    let source = TreeEvent::undefined();
    let show_progress = shows_progress(cli);
    let mut print_progress = |percent: u8| {
        if show_progress {
            println!("{}", percent);
        }
    };

    let verdict = checker.run(
        Some(cli.parameters.as_str()),
        &tree,
        Some(&source),
        &mut print_progress,
    )?;

    let report = checker.return_object().cloned().unwrap_or_default();
    println!("{}", render(verdict, report, cli.json)?);
    Ok(verdict)
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init();

    match run(&cli) {
        Ok(verdict) => ExitCode::from(exit_status(verdict)),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> cli::Cli {
        cli::Cli::try_parse_from(args).unwrap()
    }

    fn unresolved_report() -> DiskSpaceReport {
        DiskSpaceReport {
            drive_letter: Some("Q".to_string()),
            critical_free_mb: Some(1),
            total_mb: Some(-1),
            free_mb: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn json_output_has_no_progress_lines() {
        assert!(!shows_progress(&parse(&["diskcheck", "Q|1", "--json"])));
        assert!(!shows_progress(&parse(&["diskcheck", "Q|1", "--quiet"])));
        assert!(shows_progress(&parse(&["diskcheck", "Q|1"])));
    }

    #[test]
    fn json_rendering_is_a_single_document() {
        let text = render(Verdict::Fail, unresolved_report(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["verdict"], "fail");
        assert_eq!(value["report"]["total_mb"], -1);
    }

    #[test]
    fn text_rendering_prefixes_verdict() {
        assert_eq!(
            render(Verdict::Fail, unresolved_report(), false).unwrap(),
            "False - Q: gesamt: -1 MB, frei: 0 MB, Minimum: 1 MB"
        );
    }

    #[test]
    fn aborted_runs_have_their_own_exit_status() {
        let statuses = [
            exit_status(Verdict::Pass),
            exit_status(Verdict::Fail),
            exit_status(Verdict::Indeterminate),
        ];
        assert_eq!(statuses, [0, 1, 2]);
        assert!(!statuses.contains(&EXIT_ABORTED));
    }
}
