// berry/src/protocol/mifare.rs

//! ISO14443A / Mifare command bytes understood by the tags themselves.
//! Both controllers relay these, the PN532 through InDataExchange and the
//! MFRC522 through its transceive FIFO.

/// REQA: wake tags in IDLE state
pub const REQ_IDLE: u8 = 0x26;
/// WUPA: wake tags in IDLE or HALT state
pub const REQ_ALL: u8 = 0x52;

/// Anticollision / select cascade levels
pub const CASCADE_LEVEL_1: u8 = 0x93;
pub const CASCADE_LEVEL_2: u8 = 0x95;
pub const CASCADE_LEVEL_3: u8 = 0x97;

/// NVB for an anticollision request (2 valid bytes)
pub const NVB_ANTICOLLISION: u8 = 0x20;
/// NVB for a select request (7 valid bytes)
pub const NVB_SELECT: u8 = 0x70;

/// Cascade tag marking an incomplete UID part
pub const CASCADE_TAG: u8 = 0x88;

pub const AUTH_A: u8 = 0x60;
pub const AUTH_B: u8 = 0x61;
pub const READ: u8 = 0x30;
pub const WRITE: u8 = 0xA0;
pub const ULTRALIGHT_WRITE: u8 = 0xA2;
pub const DECREMENT: u8 = 0xC0;
pub const INCREMENT: u8 = 0xC1;
pub const RESTORE: u8 = 0xC2;
pub const TRANSFER: u8 = 0xB0;
pub const HALT: u8 = 0x50;

/// 4-bit ACK nibble returned by Mifare tags
pub const ACK_NIBBLE: u8 = 0x0A;

/// Block Check Character: XOR of the UID bytes of one cascade level.
pub fn bcc(uid: &[u8]) -> u8 {
    uid.iter().fold(0u8, |acc, &b| acc ^ b)
}
