//! Real HAL implementation using the platform space query and external tools.

use super::{DiskSpace, EchoOps, FixedDriveRow, SpaceOps, VolumeStatsOps, VolumeStatsRow};
use crate::sqlcmd;
use crate::{HalError, HalResult};
use log::debug;
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;
use wait_timeout::ChildExt;

const DEFAULT_PING_PROGRAM: &str = "ping";
const DEFAULT_SQLCMD_PROGRAM: &str = "sqlcmd";
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
/// Extra time granted to `ping` beyond its own reply timeout.
const ECHO_GRACE: Duration = Duration::from_secs(1);

/// Real HAL backed by `fs2`, the system `ping` and `sqlcmd`.
#[derive(Debug, Clone)]
pub struct SystemHal {
    ping_program: String,
    sqlcmd_program: String,
    command_timeout: Duration,
}

impl Default for SystemHal {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemHal {
    pub fn new() -> Self {
        Self {
            ping_program: DEFAULT_PING_PROGRAM.to_string(),
            sqlcmd_program: DEFAULT_SQLCMD_PROGRAM.to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_ping_program(mut self, program: impl Into<String>) -> Self {
        self.ping_program = program.into();
        self
    }

    pub fn with_sqlcmd_program(mut self, program: impl Into<String>) -> Self {
        self.sqlcmd_program = program.into();
        self
    }

    /// Upper bound for a whole `sqlcmd` run (login plus query).
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    fn run_sqlcmd(
        &self,
        instance: &str,
        query: &str,
        connect_timeout: Duration,
    ) -> HalResult<String> {
        let login_secs = connect_timeout.as_secs().max(1).to_string();
        let mut cmd = Command::new(&self.sqlcmd_program);
        cmd.args([
            "-S",
            instance,
            "-E",
            "-l",
            login_secs.as_str(),
            "-b",
            "-h",
            "-1",
            "-W",
            "-s",
            sqlcmd::COLUMN_SEPARATOR,
            "-Q",
            query,
        ]);
        let timeout = self.command_timeout.max(connect_timeout);
        let done = run_with_deadline(&self.sqlcmd_program, &mut cmd, timeout)?;
        if done.success {
            return Ok(done.stdout);
        }

        // sqlcmd reports most errors on stdout; keep both for classification.
        let message = format!("{} {}", done.stdout.trim(), done.stderr.trim())
            .trim()
            .to_string();
        if sqlcmd::is_connection_failure(&message) {
            Err(HalError::ConnectionFailed {
                instance: instance.to_string(),
                message,
            })
        } else {
            Err(HalError::QueryFailed {
                instance: instance.to_string(),
                message,
            })
        }
    }
}

/// Output of an external command that finished within its deadline.
struct Finished {
    success: bool,
    stdout: String,
    stderr: String,
}

fn reader_thread<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn collect(handle: JoinHandle<Vec<u8>>) -> String {
    let bytes = handle.join().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Run `cmd` to completion, killing it once `deadline` has passed.
fn run_with_deadline(program: &str, cmd: &mut Command, deadline: Duration) -> HalResult<Finished> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|err| match err.kind() {
        ErrorKind::NotFound => HalError::CommandNotFound(program.to_string()),
        _ => HalError::Io(err),
    })?;

    // Both pipes are drained while waiting so a chatty child cannot block.
    let stdout = reader_thread(child.stdout.take());
    let stderr = reader_thread(child.stderr.take());

    let Some(status) = child.wait_timeout(deadline)? else {
        let _ = child.kill();
        let _ = child.wait();
        debug!("{} killed after {} ms", program, deadline.as_millis());
        return Err(HalError::CommandTimeout {
            program: program.to_string(),
            timeout_ms: deadline.as_millis(),
        });
    };

    Ok(Finished {
        success: status.success(),
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

/// Windows `ping` exits 0 when a gateway answers "Destination host
/// unreachable"; only a line carrying a TTL is an echo reply.
fn is_echo_reply(stdout: &str) -> bool {
    stdout
        .lines()
        .any(|line| line.to_ascii_uppercase().contains("TTL="))
}

fn echo_succeeded(exit_ok: bool, stdout: &str, windows: bool) -> bool {
    exit_ok && (!windows || is_echo_reply(stdout))
}

fn ping_args(host: &str, timeout: Duration) -> Vec<String> {
    if cfg!(windows) {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().max(1).to_string(),
            host.to_string(),
        ]
    } else {
        // Unix ping only takes whole seconds.
        let secs = timeout.as_millis().div_ceil(1000).max(1).to_string();
        let flag = if cfg!(target_os = "macos") { "-t" } else { "-W" };
        vec![
            "-c".to_string(),
            "1".to_string(),
            flag.to_string(),
            secs,
            host.to_string(),
        ]
    }
}

impl SpaceOps for SystemHal {
    fn disk_space(&self, path: &str) -> HalResult<DiskSpace> {
        let total_bytes = fs2::total_space(path)?;
        let free_bytes = fs2::available_space(path)?;
        Ok(DiskSpace {
            total_bytes,
            free_bytes,
        })
    }
}

impl EchoOps for SystemHal {
    fn echo(&self, host: &str, timeout: Duration) -> HalResult<bool> {
        if host.trim().is_empty() {
            return Err(HalError::Other("echo requires a host name".to_string()));
        }
        // Would be read as an option by ping.
        if host.starts_with('-') {
            return Err(HalError::Other(format!("invalid host name '{}'", host)));
        }
        let mut cmd = Command::new(&self.ping_program);
        cmd.args(ping_args(host, timeout));
        let done = run_with_deadline(&self.ping_program, &mut cmd, timeout + ECHO_GRACE)?;
        Ok(echo_succeeded(done.success, &done.stdout, cfg!(windows)))
    }
}

impl VolumeStatsOps for SystemHal {
    fn volume_stats(
        &self,
        instance: &str,
        connect_timeout: Duration,
    ) -> HalResult<Vec<VolumeStatsRow>> {
        let out = self.run_sqlcmd(instance, sqlcmd::VOLUME_STATS_QUERY, connect_timeout)?;
        sqlcmd::parse_volume_stats(&out)
    }

    fn fixed_drives(
        &self,
        instance: &str,
        connect_timeout: Duration,
    ) -> HalResult<Vec<FixedDriveRow>> {
        let out = self.run_sqlcmd(instance, sqlcmd::FIXED_DRIVES_QUERY, connect_timeout)?;
        sqlcmd::parse_fixed_drives(&out)
    }
}
