//! Utilities for berry: small, reusable helpers used across the crate.
//!
//! Hex formatting for logs and display, and the timeout budgets shared by
//! the controller backends.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
