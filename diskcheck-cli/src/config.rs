use anyhow::{Context, Result};
use diskcheck_core::ProbeSettings;
use std::fs;
use std::path::Path;

pub fn parse_settings(toml_text: &str) -> Result<ProbeSettings> {
    toml::from_str(toml_text).context("failed to parse diskcheck settings TOML")
}

/// Load settings from `path`, or defaults when no file was given.
pub fn load_settings(path: Option<&Path>) -> Result<ProbeSettings> {
    let Some(path) = path else {
        return Ok(ProbeSettings::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("invalid settings in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load_settings(None).unwrap(), ProbeSettings::default());
    }

    #[test]
    fn loads_overrides_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diskcheck.toml");
        fs::write(
            &path,
            "connect_timeout_secs = 2\nsqlcmd_program = \"/opt/mssql-tools/bin/sqlcmd\"\n",
        )
        .unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.connect_timeout(), Duration::from_secs(2));
        assert_eq!(settings.sqlcmd_program, "/opt/mssql-tools/bin/sqlcmd");
        assert_eq!(settings.ping_program, "ping");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read settings file"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_settings("retries = 3\n").is_err());
    }
}
