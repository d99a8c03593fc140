//! HAL trait definitions and implementations.
//!
//! This module defines the capability traits used by the probe and provides
//! both real (SystemHal) and fake (FakeHal) implementations.

pub mod echo_ops;
pub mod fake_hal;
pub mod space_ops;
pub mod system_hal;
pub mod volume_stats_ops;

pub use echo_ops::EchoOps;
pub use fake_hal::{FakeFailure, FakeHal, Operation};
pub use space_ops::{DiskSpace, SpaceOps};
pub use system_hal::SystemHal;
pub use volume_stats_ops::{FixedDriveRow, VolumeStatsOps, VolumeStatsRow};

/// Complete HAL combining all capabilities a probe needs.
pub trait ProbeHal: SpaceOps + EchoOps + VolumeStatsOps + Send + Sync {}

/// Automatically implement ProbeHal for any type implementing all required traits.
impl<T> ProbeHal for T where T: SpaceOps + EchoOps + VolumeStatsOps + Send + Sync {}
