//! Filesystem space queries.

use crate::HalResult;

/// Raw byte counts reported for a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskSpace {
    pub total_bytes: u64,
    /// Bytes available to the calling user (may be less than the volume's free bytes).
    pub free_bytes: u64,
}

/// Space query trait.
pub trait SpaceOps {
    /// Query total and available bytes for a local volume (`D:`) or an
    /// administrative share (`\\server\D$`).
    fn disk_space(&self, path: &str) -> HalResult<DiskSpace>;
}
