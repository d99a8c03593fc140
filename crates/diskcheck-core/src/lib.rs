//! diskcheck core library.
//!
//! A single-shot disk space checker node: parse the parameter string, make
//! sure a remote server answers, resolve total and free space (filesystem
//! first, database volume statistics as fallback) and compare the free space
//! with the configured minimum.

pub mod checker;
pub mod params;
pub mod progress;
pub mod reachability;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod verdict;

pub use checker::{CheckOutcome, DiskSpaceChecker, NodeChecker, TreeEvent, TreeParameters};
pub use diskcheck_error::{CheckError, CheckResult};
pub use params::{parse_parameters, ProbeRequest, Target, USAGE};
pub use progress::{NoProgress, ProgressFanout, ProgressListener};
pub use report::DiskSpaceReport;
pub use settings::ProbeSettings;
pub use verdict::Verdict;
