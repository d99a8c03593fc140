//! The checker's return object.

use crate::params::ProbeRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Everything one checker invocation found out about its target.
///
/// Equality and hashing only look at the rendered summary line, so two
/// reports that print the same compare equal even if, for example, only one
/// of them came from the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskSpaceReport {
    pub server: Option<String>,
    pub drive_letter: Option<String>,
    /// Free space below which the check fails.
    pub critical_free_mb: Option<i64>,
    pub total_mb: Option<i64>,
    pub free_mb: Option<i64>,
    /// True if the numbers came from a database server's volume statistics.
    pub resolved_via_database: bool,
    /// Timeout for a single echo request.
    pub timeout_ms: Option<i32>,
    /// Echo attempts before the server counts as unreachable.
    pub retries: Option<i32>,
}

impl DiskSpaceReport {
    pub fn for_request(request: &ProbeRequest) -> Self {
        Self {
            server: request.target.server().map(str::to_string),
            drive_letter: request.target.drive().map(str::to_string),
            critical_free_mb: Some(request.min_free_mb),
            total_mb: None,
            free_mb: None,
            resolved_via_database: false,
            timeout_ms: Some(request.timeout_ms),
            retries: Some(request.max_retries),
        }
    }

    /// A total of zero or less means no tier produced usable numbers.
    pub fn is_resolved(&self) -> bool {
        self.total_mb.unwrap_or(0) > 0
    }

    fn label(&self) -> Option<String> {
        let server = self.server.as_deref().filter(|s| !s.is_empty());
        let drive = self.drive_letter.as_deref().filter(|d| !d.is_empty());
        match (server, drive) {
            (None, None) => None,
            (None, Some(drive)) => Some(drive.to_string()),
            (Some(server), None) => Some(server.to_string()),
            (Some(server), Some(drive)) => Some(format!("{}//{}", server, drive)),
        }
    }
}

struct OptNum(Option<i64>);

impl fmt::Display for OptNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{}", n),
            None => Ok(()),
        }
    }
}

impl fmt::Display for DiskSpaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(label) = self.label() else {
            return Ok(());
        };
        write!(
            f,
            "{}: gesamt: {} MB, frei: {} MB, Minimum: {} MB",
            label,
            OptNum(self.total_mb),
            OptNum(self.free_mb),
            OptNum(self.critical_free_mb)
        )
    }
}

impl PartialEq for DiskSpaceReport {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for DiskSpaceReport {}

impl Hash for DiskSpaceReport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
