//! `sqlcmd` queries and output parsing.
//!
//! Queries are run with `-h -1 -W -s "|"` so every result row is a single
//! pipe-separated line without headers or padding.

use crate::hal::{FixedDriveRow, VolumeStatsRow};
use crate::{HalError, HalResult};

pub const VOLUME_STATS_QUERY: &str = "SET NOCOUNT ON; \
SELECT DISTINCT UPPER(volume_mount_point) volume_mount_point, total_bytes, available_bytes \
FROM sys.master_files AS f \
CROSS APPLY sys.dm_os_volume_stats(f.database_id, f.file_id)";

pub const FIXED_DRIVES_QUERY: &str = "SET NOCOUNT ON; EXEC xp_fixeddrives";

pub const COLUMN_SEPARATOR: &str = "|";

const CONNECTION_MARKERS: &[&str] = &[
    "login timeout expired",
    "login failed",
    "unable to connect",
    "network-related",
    "server is not found",
    "named pipes provider",
    "tcp provider",
];

/// Decide whether a failed sqlcmd run never got past the login.
pub fn is_connection_failure(output: &str) -> bool {
    let lower = output.to_ascii_lowercase();
    CONNECTION_MARKERS.iter().any(|m| lower.contains(m))
}

fn data_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn parse_i64(field: &str, line: &str) -> HalResult<i64> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| HalError::Parse(format!("invalid number '{}' in row '{}'", field, line)))
}

pub fn parse_volume_stats(output: &str) -> HalResult<Vec<VolumeStatsRow>> {
    let mut rows = Vec::new();
    for line in data_lines(output) {
        let fields: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
        if fields.len() != 3 {
            return Err(HalError::Parse(format!(
                "expected 3 columns in volume stats row, got {}: '{}'",
                fields.len(),
                line
            )));
        }
        rows.push(VolumeStatsRow {
            mount_point: fields[0].trim().to_string(),
            total_bytes: parse_i64(fields[1], line)?,
            available_bytes: parse_i64(fields[2], line)?,
        });
    }
    Ok(rows)
}

pub fn parse_fixed_drives(output: &str) -> HalResult<Vec<FixedDriveRow>> {
    let mut rows = Vec::new();
    for line in data_lines(output) {
        let Some((drive, mb_free)) = line.split_once(COLUMN_SEPARATOR) else {
            return Err(HalError::Parse(format!(
                "expected 2 columns in fixed drives row: '{}'",
                line
            )));
        };
        rows.push(FixedDriveRow {
            drive: drive.trim().to_string(),
            mb_free: parse_i64(mb_free, line)?,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_volume_stats_rows() {
        let out = "C:\\|511101777920|102400000000\r\nE:\\|1099511627776|1024000000\r\n\r\n";
        let rows = parse_volume_stats(out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mount_point, "C:\\");
        assert_eq!(rows[0].total_bytes, 511_101_777_920);
        assert_eq!(rows[1].available_bytes, 1_024_000_000);
    }

    #[test]
    fn volume_stats_rejects_short_rows() {
        let err = parse_volume_stats("C:\\|123").unwrap_err();
        assert!(matches!(err, HalError::Parse(_)));
    }

    #[test]
    fn parses_fixed_drives_rows() {
        let rows = parse_fixed_drives("C|51234\nD| 50 \n").unwrap();
        assert_eq!(
            rows,
            vec![
                FixedDriveRow {
                    drive: "C".to_string(),
                    mb_free: 51234
                },
                FixedDriveRow {
                    drive: "D".to_string(),
                    mb_free: 50
                },
            ]
        );
    }

    #[test]
    fn fixed_drives_rejects_non_numeric_free_space() {
        assert!(parse_fixed_drives("C|lots").is_err());
    }

    #[test]
    fn empty_output_yields_no_rows() {
        assert!(parse_volume_stats("").unwrap().is_empty());
        assert!(parse_fixed_drives("\n\n").unwrap().is_empty());
    }

    #[test]
    fn recognizes_login_failures() {
        assert!(is_connection_failure(
            "Sqlcmd: Error: Microsoft ODBC Driver 17 for SQL Server : Login timeout expired."
        ));
        assert!(!is_connection_failure(
            "Msg 208, Level 16, State 1: Invalid object name 'sys.dm_os_volume_stats'."
        ));
    }
}
