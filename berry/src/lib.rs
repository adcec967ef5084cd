// berry/src/lib.rs

//! berry
//!
//! Pure Rust drivers for the contactless tag controllers found on
//! single-board computer hats: a PN532 reached over a bit-banged serial
//! link and an MFRC522 reached over a register bus.
#![warn(missing_docs)]

pub mod card;
pub mod constants;
pub mod device;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
