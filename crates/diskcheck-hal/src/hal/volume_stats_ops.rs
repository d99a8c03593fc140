//! Database volume statistics.
//!
//! A database server knows the volumes its data files live on. These queries
//! use it purely as an information source when the administrative share is
//! not accessible.

use crate::HalResult;
use std::time::Duration;

/// One row of the volume statistics view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeStatsRow {
    /// Mount point as reported by the server, e.g. `C:\`.
    pub mount_point: String,
    pub total_bytes: i64,
    pub available_bytes: i64,
}

/// One row of the legacy fixed-drives listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDriveRow {
    pub drive: String,
    /// The listing's free-space column, unscaled.
    pub mb_free: i64,
}

pub trait VolumeStatsOps {
    /// Distinct volume mount points with their total and available bytes.
    fn volume_stats(
        &self,
        instance: &str,
        connect_timeout: Duration,
    ) -> HalResult<Vec<VolumeStatsRow>>;

    /// Legacy fixed drives listing for servers where the statistics view is
    /// unavailable (older versions, missing permissions).
    fn fixed_drives(
        &self,
        instance: &str,
        connect_timeout: Duration,
    ) -> HalResult<Vec<FixedDriveRow>>;
}
