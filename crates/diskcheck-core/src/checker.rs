//! The disk space checker node.

use crate::params::{parse_parameters, ProbeRequest, Target};
use crate::progress::ProgressListener;
use crate::reachability::{ensure_reachable, EchoPolicy};
use crate::report::DiskSpaceReport;
use crate::resolver::{resolve_by_database, resolve_by_filesystem};
use crate::settings::ProbeSettings;
use crate::verdict::Verdict;
use diskcheck_error::{CheckError, CheckResult};
use diskcheck_hal::ProbeHal;
use log::{debug, info};
use serde::Serialize;

/// Parameters that apply to the whole decision tree. Not used by this checker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeParameters {
    pub name: String,
    pub parameters: Option<String>,
}

impl TreeParameters {
    pub fn new(name: impl Into<String>, parameters: Option<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// The tree event that triggered a run. Not used by this checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEvent {
    pub name: String,
}

impl TreeEvent {
    pub fn undefined() -> Self {
        Self {
            name: "UndefinedTreeEvent".to_string(),
        }
    }
}

/// Host-facing contract of a checker node.
pub trait NodeChecker {
    type ReturnObject;

    fn run(
        &mut self,
        params: Option<&str>,
        tree: &TreeParameters,
        source: Option<&TreeEvent>,
        progress: &mut dyn ProgressListener,
    ) -> CheckResult<Verdict>;

    /// Result object of the most recent run, also after a failed run.
    fn return_object(&self) -> Option<&Self::ReturnObject>;

    fn set_return_object(&mut self, value: Option<Self::ReturnObject>);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    pub report: DiskSpaceReport,
}

/// Checks that a local volume or a server share has enough free space.
pub struct DiskSpaceChecker<H> {
    hal: H,
    settings: ProbeSettings,
    return_object: Option<DiskSpaceReport>,
}

impl<H: ProbeHal> DiskSpaceChecker<H> {
    pub fn new(hal: H) -> Self {
        Self::with_settings(hal, ProbeSettings::default())
    }

    pub fn with_settings(hal: H, settings: ProbeSettings) -> Self {
        Self {
            hal,
            settings,
            return_object: None,
        }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Run one check and hand back the verdict together with its report.
    pub fn check(
        &self,
        params: Option<&str>,
        progress: &mut dyn ProgressListener,
    ) -> CheckResult<CheckOutcome> {
        let mut report = DiskSpaceReport::default();
        let verdict = self.probe(params, &mut report, progress)?;
        Ok(CheckOutcome { verdict, report })
    }

    fn probe(
        &self,
        params: Option<&str>,
        report: &mut DiskSpaceReport,
        progress: &mut dyn ProgressListener,
    ) -> CheckResult<Verdict> {
        progress.progress_changed(0);

        let request = parse_parameters(params)?;
        *report = DiskSpaceReport::for_request(&request);
        info!("checking free disk space on {}", request.target);

        if let Target::Remote { server, .. } = &request.target {
            let policy = EchoPolicy::new(
                request.timeout_ms,
                request.max_retries,
                self.settings.retry_delay(),
            );
            ensure_reachable(&self.hal, server, &policy, progress)?;
        }

        resolve_by_filesystem(&self.hal, report);
        if !report.is_resolved() && report.server.is_some() {
            debug!("filesystem query yielded nothing, asking the database server");
            resolve_by_database(&self.hal, report, self.settings.connect_timeout());
        }

        if !report.is_resolved() {
            unresolved(&request, report)?;
        }

        progress.progress_changed(100);

        let verdict = evaluate(report);
        info!("{} - {}", verdict, report);
        Ok(verdict)
    }
}

fn unresolved(request: &ProbeRequest, report: &mut DiskSpaceReport) -> CheckResult<()> {
    if request.fail_on_unresolved {
        return Err(CheckError::UnresolvedSpace {
            target: request.target.drive().unwrap_or("-").to_string(),
        });
    }
    report.total_mb = Some(-1);
    Ok(())
}

/// Pass only with a known total and at least the critical free space.
pub fn evaluate(report: &DiskSpaceReport) -> Verdict {
    let total = report.total_mb.unwrap_or(-1);
    let free = report.free_mb.unwrap_or(0);
    let critical = report.critical_free_mb.unwrap_or(0);
    Verdict::from(total >= 0 && free >= critical)
}

impl<H: ProbeHal> NodeChecker for DiskSpaceChecker<H> {
    type ReturnObject = DiskSpaceReport;

    fn run(
        &mut self,
        params: Option<&str>,
        _tree: &TreeParameters,
        _source: Option<&TreeEvent>,
        progress: &mut dyn ProgressListener,
    ) -> CheckResult<Verdict> {
        let mut report = DiskSpaceReport::default();
        let result = self.probe(params, &mut report, progress);
        self.return_object = Some(report);
        result
    }

    fn return_object(&self) -> Option<&DiskSpaceReport> {
        self.return_object.as_ref()
    }

    fn set_return_object(&mut self, value: Option<DiskSpaceReport>) {
        self.return_object = value;
    }
}
