//! Tunables that are not part of the checker parameter string.

use diskcheck_hal::SystemHal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_RETRY_DELAY_MS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Pause between two echo attempts.
    pub retry_delay_ms: u64,
    /// Login timeout for the database fallback.
    pub connect_timeout_secs: u64,
    /// Hard limit for any external command.
    pub command_timeout_secs: u64,
    pub ping_program: String,
    pub sqlcmd_program: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            ping_program: "ping".to_string(),
            sqlcmd_program: "sqlcmd".to_string(),
        }
    }
}

impl ProbeSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Build the real HAL configured with these settings.
    pub fn system_hal(&self) -> SystemHal {
        SystemHal::new()
            .with_ping_program(&self.ping_program)
            .with_sqlcmd_program(&self.sqlcmd_program)
            .with_command_timeout(self.command_timeout())
    }
}
