//! Make sure a remote server answers before asking it about its disks.

use crate::progress::ProgressListener;
use diskcheck_error::{CheckError, CheckResult};
use diskcheck_hal::EchoOps;
use log::debug;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoPolicy {
    /// Per-attempt reply timeout.
    pub timeout: Duration,
    pub max_attempts: i32,
    /// Pause before the next attempt.
    pub retry_delay: Duration,
}

impl EchoPolicy {
    pub fn new(timeout_ms: i32, max_attempts: i32, retry_delay: Duration) -> Self {
        Self {
            timeout: Duration::from_millis(u64::try_from(timeout_ms).unwrap_or(0)),
            max_attempts,
            retry_delay,
        }
    }
}

/// Echo host name for a server as written in the parameters (`\\srv` → `srv`).
pub fn echo_host(server: &str) -> &str {
    server.trim_start_matches('\\')
}

fn attempt_percent(attempt: i32, max_attempts: i32) -> u8 {
    let percent = (100.0 * f64::from(attempt)) / f64::from(max_attempts) + 0.5;
    percent.clamp(0.0, 100.0) as u8
}

/// Echo `server` up to `policy.max_attempts` times, stopping at the first reply.
///
/// Progress is reported after every attempt. A transport error counts as a
/// failed attempt.
pub fn ensure_reachable(
    echo: &dyn EchoOps,
    server: &str,
    policy: &EchoPolicy,
    progress: &mut dyn ProgressListener,
) -> CheckResult<()> {
    let host = echo_host(server);
    for attempt in 1..=policy.max_attempts {
        let reachable = match echo.echo(host, policy.timeout) {
            Ok(reachable) => reachable,
            Err(err) => {
                debug!("echo to {} failed: {}", host, err);
                false
            }
        };
        progress.progress_changed(attempt_percent(attempt, policy.max_attempts));
        if reachable {
            return Ok(());
        }
        debug!(
            "no echo reply from {} (attempt {}/{})",
            host, attempt, policy.max_attempts
        );
        if attempt < policy.max_attempts {
            std::thread::sleep(policy.retry_delay);
        }
    }
    Err(CheckError::Unreachable {
        server: server.to_string(),
    })
}
