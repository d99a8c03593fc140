//! Network echo (ICMP ping).

use crate::HalResult;
use std::time::Duration;

pub trait EchoOps {
    /// Send a single echo request. `Ok(true)` means a successful reply arrived
    /// within `timeout`; `Ok(false)` means no (or an unsuccessful) reply.
    fn echo(&self, host: &str, timeout: Duration) -> HalResult<bool>;
}
