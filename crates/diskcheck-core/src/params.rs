//! Checker parameter string parsing.
//!
//! Grammar: `target|minFreeMB[|timeoutMs[|maxRetries[|failOnUnresolved]]]`
//! where `target` is a drive letter (`D`, `d:`) or `\\server[\X[$]]`.

use diskcheck_error::{CheckError, CheckResult};
use regex::Regex;
use std::fmt;

pub const USAGE: &str = "Usage: DiskSpaceChecker share-or-drive-letter|min-free-space(MB)\
[|timeout-ms[|max-attempts[|fail-on-unresolved (true/false)]]]";

pub const DEFAULT_TIMEOUT_MS: i32 = 2000;
pub const DEFAULT_MAX_RETRIES: i32 = 1;

const FIELD_SEPARATOR: char = '|';
const SERVER_PATTERN: &str = r"\\\\[\w-]+(.*)";

/// What the checker looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A local volume, e.g. `D`.
    Local { drive: String },
    /// A remote server, optionally narrowed to one of its volumes.
    Remote {
        server: String,
        drive: Option<String>,
    },
}

impl Target {
    pub fn server(&self) -> Option<&str> {
        match self {
            Target::Local { .. } => None,
            Target::Remote { server, .. } => Some(server),
        }
    }

    pub fn drive(&self) -> Option<&str> {
        match self {
            Target::Local { drive } => Some(drive),
            Target::Remote { drive, .. } => drive.as_deref(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Local { drive } => write!(f, "{}:", drive),
            Target::Remote {
                server,
                drive: Some(drive),
            } => write!(f, "{}\\{}$", server, drive),
            Target::Remote {
                server,
                drive: None,
            } => write!(f, "{}", server),
        }
    }
}

/// A validated checker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub target: Target,
    pub min_free_mb: i64,
    pub timeout_ms: i32,
    pub max_retries: i32,
    pub fail_on_unresolved: bool,
}

pub fn parse_parameters(raw: Option<&str>) -> CheckResult<ProbeRequest> {
    let raw = raw.map(str::trim).ok_or_else(|| {
        CheckError::validation(format!("no parameters were given.\n{}", USAGE))
    })?;
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    let share = fields.first().copied().unwrap_or_default();

    let target = parse_target(share)?;

    let min_free_mb = fields
        .get(1)
        .and_then(|field| field.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            CheckError::validation(format!(
                "please specify a minimum free space in MB.\n{}",
                USAGE
            ))
        })?;

    // Optional fields never fail the parse; garbage means "use the default".
    let timeout_ms = optional_field(&fields, 2)
        .and_then(|field| field.parse::<i32>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    let max_retries = optional_field(&fields, 3)
        .and_then(|field| field.parse::<i32>().ok())
        .unwrap_or(DEFAULT_MAX_RETRIES);
    let fail_on_unresolved = optional_field(&fields, 4)
        .and_then(parse_bool)
        .unwrap_or(false);

    Ok(ProbeRequest {
        target,
        min_free_mb,
        timeout_ms,
        max_retries,
        fail_on_unresolved,
    })
}

fn optional_field<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields.get(index).map(|field| field.trim())
}

fn parse_bool(field: &str) -> Option<bool> {
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Resolve the first parameter field into a local drive or a server.
pub fn parse_target(share: &str) -> CheckResult<Target> {
    let mut drive = None;
    let mut server = None;

    if !share.is_empty() {
        drive = single_letter(share);
        if drive.is_none() {
            server = server_name(share)?;
        }
    }
    if drive.is_none() {
        drive = trailing_drive_letter(share);
    }

    match (server, drive) {
        (Some(server), drive) => Ok(Target::Remote { server, drive }),
        (None, Some(drive)) => Ok(Target::Local { drive }),
        (None, None) => Err(CheckError::validation(format!(
            "drive or server '{}' was not found.\n{}",
            share, USAGE
        ))),
    }
}

/// `d`, `D:` or `d::` → `D`.
fn single_letter(share: &str) -> Option<String> {
    let candidate = share.trim_end_matches(':').to_uppercase();
    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Some(candidate),
        _ => None,
    }
}

fn server_name(share: &str) -> CheckResult<Option<String>> {
    let re = Regex::new(SERVER_PATTERN)
        .map_err(|e| CheckError::validation(format!("invalid server pattern: {}", e)))?;
    let normalized = format!("\\\\{}", share.trim_start_matches('\\'));
    let Some(caps) = re.captures(&normalized) else {
        return Ok(None);
    };
    match caps.get(1).map(|m| m.as_str()).filter(|rest| !rest.is_empty()) {
        Some(rest) => Ok(Some(share.replace(rest, ""))),
        None => Ok(Some(normalized)),
    }
}

/// Last path segment of `\\server\c$` style targets, if it is one character.
fn trailing_drive_letter(share: &str) -> Option<String> {
    let (_, tail) = share.rsplit_once('\\')?;
    let letter = tail.trim_end_matches('$');
    if letter.trim().is_empty() || letter.chars().count() != 1 {
        return None;
    }
    Some(letter.to_uppercase())
}
