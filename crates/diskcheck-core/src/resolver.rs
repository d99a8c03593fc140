//! Space resolution tiers.
//!
//! The filesystem tier always runs first and is authoritative when it yields a
//! positive total. The database tier asks a database server on the target
//! host for its volume statistics and only runs when the filesystem tier came
//! back empty.

use crate::report::DiskSpaceReport;
use diskcheck_hal::{FixedDriveRow, SpaceOps, VolumeStatsOps, VolumeStatsRow};
use log::{debug, warn};
use std::time::Duration;

/// Bytes per reported megabyte (KiB × 1000, kept for output compatibility).
pub const BYTES_PER_MB: i64 = 1024 * 1000;
/// The legacy fixed-drives listing's free column is scaled by this to get MB.
pub const LEGACY_FREE_SCALE: i64 = 1000;
/// Instance name used when the target server is the local machine.
pub const LOCAL_INSTANCE: &str = "(local)";
/// Total reported when the legacy listing supplied only the free space.
pub const UNKNOWN_TOTAL_MB: i64 = -1;

pub fn bytes_to_mb(bytes: i64) -> i64 {
    bytes / BYTES_PER_MB
}

fn unsigned_bytes_to_mb(bytes: u64) -> i64 {
    bytes_to_mb(i64::try_from(bytes).unwrap_or(i64::MAX))
}

/// `\\DataServer` + `C` → `\\DataServer\C$`.
pub fn admin_share_path(server: &str, drive: &str) -> String {
    format!("\\\\{}\\{}$", server.trim_start_matches('\\'), drive)
}

/// Run the filesystem tier and store its numbers in `report`.
///
/// A server without a drive letter cannot be queried and yields zeros, as
/// does a failed query.
pub fn resolve_by_filesystem(space: &dyn SpaceOps, report: &mut DiskSpaceReport) {
    report.resolved_via_database = false;

    let path = match (report.server.as_deref(), report.drive_letter.as_deref()) {
        (Some(server), Some(drive)) => Some(admin_share_path(server, drive)),
        (Some(_), None) => None,
        (None, drive) => Some(format!("{}:", drive.unwrap_or_default())),
    };

    let (total_mb, free_mb) = match path {
        Some(path) => match space.disk_space(&path) {
            Ok(space) => {
                debug!(
                    "{}: {} bytes total, {} bytes free",
                    path, space.total_bytes, space.free_bytes
                );
                (
                    unsigned_bytes_to_mb(space.total_bytes),
                    unsigned_bytes_to_mb(space.free_bytes),
                )
            }
            Err(err) => {
                debug!("space query for {} failed: {}", path, err);
                (0, 0)
            }
        },
        None => (0, 0),
    };
    report.total_mb = Some(total_mb);
    report.free_mb = Some(free_mb);
}

/// Database instance for a server as written in the parameters.
pub fn instance_name(server: &str) -> Option<String> {
    let name = server.trim_start_matches('\\');
    if name.is_empty() {
        return None;
    }
    if name.eq_ignore_ascii_case("localhost") {
        return Some(LOCAL_INSTANCE.to_string());
    }
    Some(name.to_string())
}

fn mount_point_matches(mount_point: &str, drive: &str) -> bool {
    mount_point.to_uppercase().replace(":\\", "") == drive.to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DatabaseSpace {
    total_mb: i64,
    free_mb: i64,
}

fn from_volume_stats(rows: &[VolumeStatsRow], drive: &str) -> Option<DatabaseSpace> {
    rows.iter()
        .find(|row| mount_point_matches(&row.mount_point, drive))
        .map(|row| DatabaseSpace {
            total_mb: bytes_to_mb(row.total_bytes),
            free_mb: bytes_to_mb(row.available_bytes),
        })
}

fn from_fixed_drives(rows: &[FixedDriveRow], drive: &str) -> Option<DatabaseSpace> {
    let drive = drive.to_uppercase();
    rows.iter()
        .find(|row| row.drive.to_uppercase() == drive)
        .map(|row| DatabaseSpace {
            total_mb: UNKNOWN_TOTAL_MB,
            free_mb: row.mb_free.saturating_mul(LEGACY_FREE_SCALE),
        })
}

fn query_database(
    stats: &dyn VolumeStatsOps,
    instance: &str,
    drive: &str,
    connect_timeout: Duration,
) -> Option<DatabaseSpace> {
    match stats.volume_stats(instance, connect_timeout) {
        Ok(rows) => from_volume_stats(&rows, drive),
        Err(err) if err.is_connection_level() => {
            debug!("no database access on {}: {}", instance, err);
            None
        }
        Err(err) => {
            debug!(
                "volume statistics unavailable on {} ({}), trying fixed drives listing",
                instance, err
            );
            match stats.fixed_drives(instance, connect_timeout) {
                Ok(rows) => from_fixed_drives(&rows, drive),
                Err(err) => {
                    warn!("fixed drives listing failed on {}: {}", instance, err);
                    None
                }
            }
        }
    }
}

/// Run the database tier. Returns true if it supplied numbers.
///
/// Every failure inside this tier is swallowed; the report is left untouched
/// and the caller's unresolved handling decides what happens next.
pub fn resolve_by_database(
    stats: &dyn VolumeStatsOps,
    report: &mut DiskSpaceReport,
    connect_timeout: Duration,
) -> bool {
    let Some(instance) = report.server.as_deref().and_then(instance_name) else {
        return false;
    };
    let Some(drive) = report.drive_letter.as_deref().filter(|d| !d.is_empty()) else {
        return false;
    };

    match query_database(stats, &instance, drive, connect_timeout) {
        Some(space) => {
            debug!(
                "{} reported {} MB total, {} MB free for {}",
                instance, space.total_mb, space.free_mb, drive
            );
            report.resolved_via_database = true;
            report.total_mb = Some(space.total_mb);
            report.free_mb = Some(space.free_mb);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskcheck_hal::{FakeFailure, FakeHal, Operation};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn remote(server: &str, drive: Option<&str>) -> DiskSpaceReport {
        DiskSpaceReport {
            server: Some(server.to_string()),
            drive_letter: drive.map(str::to_string),
            ..Default::default()
        }
    }

    fn volume(mount_point: &str, total_bytes: i64, available_bytes: i64) -> VolumeStatsRow {
        VolumeStatsRow {
            mount_point: mount_point.to_string(),
            total_bytes,
            available_bytes,
        }
    }

    #[test]
    fn mb_conversion_uses_fixed_divisor() {
        assert_eq!(bytes_to_mb(1_024_000_000), 1000);
        assert_eq!(bytes_to_mb(1_023_999), 0);
        assert_eq!(unsigned_bytes_to_mb(u64::MAX), i64::MAX / BYTES_PER_MB);
    }

    #[test]
    fn local_drive_queries_colon_path() {
        let hal = FakeHal::new().with_disk_space("D:", 1_024_000_000, 153_600_000);
        let mut report = DiskSpaceReport {
            drive_letter: Some("D".to_string()),
            resolved_via_database: true,
            ..Default::default()
        };
        resolve_by_filesystem(&hal, &mut report);
        assert_eq!(report.total_mb, Some(1000));
        assert_eq!(report.free_mb, Some(150));
        assert!(!report.resolved_via_database);
    }

    #[test]
    fn remote_drive_queries_admin_share() {
        let hal = FakeHal::new().with_disk_space(r"\\DataServer\C$", 2_048_000_000, 0);
        let mut report = remote(r"\\DataServer", Some("C"));
        resolve_by_filesystem(&hal, &mut report);
        assert_eq!(report.total_mb, Some(2000));
        assert!(hal.has_operation(
            |op| matches!(op, Operation::DiskSpace { path } if path == r"\\DataServer\C$")
        ));
    }

    #[test]
    fn server_without_drive_is_not_queried() {
        let hal = FakeHal::new();
        let mut report = remote(r"\\DataServer", None);
        resolve_by_filesystem(&hal, &mut report);
        assert_eq!(hal.operation_count(), 0);
        assert_eq!(report.total_mb, Some(0));
        assert_eq!(report.free_mb, Some(0));
    }

    #[test]
    fn failed_query_yields_zero() {
        let hal = FakeHal::new();
        let mut report = remote("Localhost", Some("D"));
        resolve_by_filesystem(&hal, &mut report);
        assert_eq!(report.total_mb, Some(0));
        assert!(hal.has_operation(
            |op| matches!(op, Operation::DiskSpace { path } if path == r"\\Localhost\D$")
        ));
    }

    #[test]
    fn instance_names() {
        assert_eq!(instance_name(r"\\DataServer").as_deref(), Some("DataServer"));
        assert_eq!(instance_name("LOCALHOST").as_deref(), Some(LOCAL_INSTANCE));
        assert_eq!(instance_name(r"\\"), None);
    }

    #[test]
    fn volume_stats_match_on_drive_letter() {
        let hal = FakeHal::new().with_volume_stats(vec![
            volume("C:\\", 10_240_000_000, 1_024_000_000),
            volume("d:\\", 20_480_000_000, 5_120_000_000),
        ]);
        let mut report = remote("localhost", Some("D"));
        assert!(resolve_by_database(&hal, &mut report, TIMEOUT));
        assert_eq!(report.total_mb, Some(20000));
        assert_eq!(report.free_mb, Some(5000));
        assert!(report.resolved_via_database);
        assert!(hal.has_operation(|op| matches!(
            op,
            Operation::VolumeStats { instance, connect_timeout_secs: 5 } if instance == "(local)"
        )));
    }

    #[test]
    fn no_matching_volume_does_not_try_legacy_listing() {
        let hal = FakeHal::new()
            .with_volume_stats(vec![volume("C:\\", 10_240_000_000, 1_024_000_000)])
            .with_fixed_drives(vec![FixedDriveRow {
                drive: "E".to_string(),
                mb_free: 50,
            }]);
        let mut report = remote("db01", Some("E"));
        assert!(!resolve_by_database(&hal, &mut report, TIMEOUT));
        assert!(!report.resolved_via_database);
        assert!(!hal.has_operation(|op| matches!(op, Operation::FixedDrives { .. })));
    }

    #[test]
    fn query_failure_falls_back_to_fixed_drives() {
        let hal = FakeHal::new()
            .with_volume_stats_failure(FakeFailure::Query)
            .with_fixed_drives(vec![
                FixedDriveRow {
                    drive: "C".to_string(),
                    mb_free: 7,
                },
                FixedDriveRow {
                    drive: "E".to_string(),
                    mb_free: 50,
                },
            ]);
        let mut report = remote("db01", Some("e"));
        assert!(resolve_by_database(&hal, &mut report, TIMEOUT));
        assert_eq!(report.free_mb, Some(50_000));
        assert_eq!(report.total_mb, Some(UNKNOWN_TOTAL_MB));
        assert!(report.resolved_via_database);
    }

    #[test]
    fn connection_failure_skips_the_tier() {
        let hal = FakeHal::new()
            .with_volume_stats_failure(FakeFailure::Connection)
            .with_fixed_drives(vec![FixedDriveRow {
                drive: "E".to_string(),
                mb_free: 50,
            }]);
        let mut report = remote("db01", Some("E"));
        assert!(!resolve_by_database(&hal, &mut report, TIMEOUT));
        assert_eq!(report.free_mb, None);
        assert_eq!(hal.operation_count(), 1);
    }

    #[test]
    fn legacy_failure_is_swallowed() {
        let hal = FakeHal::new()
            .with_volume_stats_failure(FakeFailure::Query)
            .with_fixed_drives_failure(FakeFailure::Timeout);
        let mut report = remote("db01", Some("E"));
        assert!(!resolve_by_database(&hal, &mut report, TIMEOUT));
        assert_eq!(hal.operation_count(), 2);
    }

    #[test]
    fn missing_drive_skips_the_tier() {
        let hal = FakeHal::new().with_volume_stats(vec![volume("C:\\", 1, 1)]);
        let mut report = remote("db01", None);
        assert!(!resolve_by_database(&hal, &mut report, TIMEOUT));
        assert_eq!(hal.operation_count(), 0);
    }
}
