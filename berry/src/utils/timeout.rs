//! Timeout helpers used across the crate.
//!
//! The controllers count time in polling steps rather than measuring it,
//! so these constants describe budgets, not deadlines.

use std::time::Duration;

/// Default response timeout in milliseconds for PN532 commands.
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// Sleep between PN532 ready polls; also the unit elapsed time is counted in.
pub const READY_POLL_INTERVAL_MS: u32 = 10;

/// How long a PN532 passive target listing may wait for its response.
pub const LIST_TARGET_TIMEOUT_MS: u32 = 30_000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
