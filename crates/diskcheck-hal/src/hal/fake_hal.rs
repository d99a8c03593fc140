//! Fake HAL implementation for testing.
//!
//! This implementation answers from scripted responses and records every
//! call, allowing the probe pipeline to be tested without a network, a
//! Windows share or a database server.

use super::{DiskSpace, EchoOps, FixedDriveRow, SpaceOps, VolumeStatsOps, VolumeStatsRow};
use crate::{HalError, HalResult};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    DiskSpace {
        path: String,
    },
    Echo {
        host: String,
        timeout_ms: u128,
    },
    VolumeStats {
        instance: String,
        connect_timeout_secs: u64,
    },
    FixedDrives {
        instance: String,
        connect_timeout_secs: u64,
    },
}

/// Scripted failure kinds (HalError itself is not Clone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    Connection,
    Query,
    Timeout,
}

impl FakeFailure {
    fn to_error(self, instance: &str) -> HalError {
        match self {
            FakeFailure::Connection => HalError::ConnectionFailed {
                instance: instance.to_string(),
                message: "Login timeout expired".to_string(),
            },
            FakeFailure::Query => HalError::QueryFailed {
                instance: instance.to_string(),
                message: "permission denied".to_string(),
            },
            FakeFailure::Timeout => HalError::CommandTimeout {
                program: "fake".to_string(),
                timeout_ms: 0,
            },
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted<T> {
    Rows(Vec<T>),
    Fail(FakeFailure),
}

#[derive(Debug, Clone)]
enum EchoReply {
    Reply(bool),
    Error,
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    spaces: HashMap<String, DiskSpace>,
    echo_replies: VecDeque<EchoReply>,
    /// Reply once the scripted queue is exhausted
    default_echo: bool,
    volume_stats: Scripted<VolumeStatsRow>,
    fixed_drives: Scripted<FixedDriveRow>,
}

impl Default for FakeHalState {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
            spaces: HashMap::new(),
            echo_replies: VecDeque::new(),
            default_echo: true,
            volume_stats: Scripted::Fail(FakeFailure::Connection),
            fixed_drives: Scripted::Fail(FakeFailure::Connection),
        }
    }
}

/// Fake HAL that answers from scripted responses.
///
/// By default every host answers echo requests, no path has any space and
/// no database server can be reached.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeHalState::default())),
        }
    }

    pub fn with_disk_space(self, path: &str, total_bytes: u64, free_bytes: u64) -> Self {
        self.state.lock().unwrap().spaces.insert(
            path.to_string(),
            DiskSpace {
                total_bytes,
                free_bytes,
            },
        );
        self
    }

    /// Queue echo replies, consumed one per request.
    pub fn with_echo_replies(self, replies: &[bool]) -> Self {
        self.state
            .lock()
            .unwrap()
            .echo_replies
            .extend(replies.iter().copied().map(EchoReply::Reply));
        self
    }

    /// Queue an echo request that fails at the transport level.
    pub fn with_echo_error(self) -> Self {
        self.state
            .lock()
            .unwrap()
            .echo_replies
            .push_back(EchoReply::Error);
        self
    }

    pub fn with_default_echo(self, reachable: bool) -> Self {
        self.state.lock().unwrap().default_echo = reachable;
        self
    }

    pub fn with_volume_stats(self, rows: Vec<VolumeStatsRow>) -> Self {
        self.state.lock().unwrap().volume_stats = Scripted::Rows(rows);
        self
    }

    pub fn with_volume_stats_failure(self, failure: FakeFailure) -> Self {
        self.state.lock().unwrap().volume_stats = Scripted::Fail(failure);
        self
    }

    pub fn with_fixed_drives(self, rows: Vec<FixedDriveRow>) -> Self {
        self.state.lock().unwrap().fixed_drives = Scripted::Rows(rows);
        self
    }

    pub fn with_fixed_drives_failure(self, failure: FakeFailure) -> Self {
        self.state.lock().unwrap().fixed_drives = Scripted::Fail(failure);
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Number of echo requests sent so far.
    pub fn echo_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::Echo { .. }))
            .count()
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.state.lock().unwrap().operations.clear();
    }

    fn record_operation(&self, op: Operation) {
        self.state.lock().unwrap().operations.push(op);
    }
}

impl SpaceOps for FakeHal {
    fn disk_space(&self, path: &str) -> HalResult<DiskSpace> {
        self.record_operation(Operation::DiskSpace {
            path: path.to_string(),
        });
        self.state
            .lock()
            .unwrap()
            .spaces
            .get(path)
            .copied()
            .ok_or_else(|| {
                HalError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such volume: {}", path),
                ))
            })
    }
}

impl EchoOps for FakeHal {
    fn echo(&self, host: &str, timeout: Duration) -> HalResult<bool> {
        self.record_operation(Operation::Echo {
            host: host.to_string(),
            timeout_ms: timeout.as_millis(),
        });
        let mut state = self.state.lock().unwrap();
        match state.echo_replies.pop_front() {
            Some(EchoReply::Reply(reachable)) => Ok(reachable),
            Some(EchoReply::Error) => Err(HalError::Other(format!(
                "transmit failed for {}",
                host
            ))),
            None => Ok(state.default_echo),
        }
    }
}

impl VolumeStatsOps for FakeHal {
    fn volume_stats(
        &self,
        instance: &str,
        connect_timeout: Duration,
    ) -> HalResult<Vec<VolumeStatsRow>> {
        self.record_operation(Operation::VolumeStats {
            instance: instance.to_string(),
            connect_timeout_secs: connect_timeout.as_secs(),
        });
        match &self.state.lock().unwrap().volume_stats {
            Scripted::Rows(rows) => Ok(rows.clone()),
            Scripted::Fail(failure) => Err(failure.to_error(instance)),
        }
    }

    fn fixed_drives(
        &self,
        instance: &str,
        connect_timeout: Duration,
    ) -> HalResult<Vec<FixedDriveRow>> {
        self.record_operation(Operation::FixedDrives {
            instance: instance.to_string(),
            connect_timeout_secs: connect_timeout.as_secs(),
        });
        match &self.state.lock().unwrap().fixed_drives {
            Scripted::Rows(rows) => Ok(rows.clone()),
            Scripted::Fail(failure) => Err(failure.to_error(instance)),
        }
    }
}
