//! diskcheck Hardware Abstraction Layer (HAL).
//!
//! Everything the probe needs from the outside world (filesystem space
//! queries, echo requests, database volume statistics) goes through the
//! traits in [`hal`], so the pipeline can be driven by [`FakeHal`] in tests.

pub mod hal;
pub mod sqlcmd;

pub use diskcheck_error::{HalError, HalResult};
pub use hal::{
    DiskSpace, EchoOps, FakeFailure, FakeHal, FixedDriveRow, Operation, ProbeHal, SpaceOps,
    SystemHal, VolumeStatsOps, VolumeStatsRow,
};
