use std::io;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type CheckResult<T> = Result<T, CheckError>;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("Connection to {instance} failed: {message}")]
    ConnectionFailed { instance: String, message: String },

    #[error("Query failed on {instance}: {message}")]
    QueryFailed { instance: String, message: String },

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command timed out: {program} after {timeout_ms}ms")]
    CommandTimeout { program: String, timeout_ms: u128 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

impl HalError {
    /// True for failures that happen before a query ever reaches the server.
    pub fn is_connection_level(&self) -> bool {
        matches!(
            self,
            HalError::ConnectionFailed { .. }
                | HalError::CommandNotFound(_)
                | HalError::CommandTimeout { .. }
                | HalError::Io(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("DiskSpaceChecker: {0}")]
    Validation(String),

    #[error("DiskSpaceChecker: server '{server}' could not be reached.")]
    Unreachable { server: String },

    #[error("DiskSpaceChecker: no disk space could be determined for '{target}'.")]
    UnresolvedSpace { target: String },
}

impl CheckError {
    pub fn validation(message: impl Into<String>) -> Self {
        CheckError::Validation(message.into())
    }
}
