// berry/src/protocol/mod.rs

pub mod checksum;
pub mod frame;
pub mod mifare;
pub mod ndef;
pub mod parser;

pub use checksum::{crc_a, crc_a_bytes, dcs, lcs};
pub use frame::{Direction, Frame};
