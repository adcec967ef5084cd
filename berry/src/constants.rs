// berry/src/constants.rs
//! Common protocol constants used across the crate

/// Controller frame preamble + start code: 0x00 0x00 0xFF
pub const FRAME_PREAMBLE: [u8; 3] = [0x00, 0x00, 0xFF];

/// Controller frame postamble: 0x00
pub const FRAME_POSTAMBLE: u8 = 0x00;

/// Bytes a frame adds around its payload:
/// preamble(3) + len(1) + lcs(1) + tfi(1) + dcs(1) + postamble(1)
pub const FRAME_OVERHEAD: usize = 8;

/// Maximum payload length (LEN counts the direction byte too)
pub const FRAME_MAX_PAYLOAD_LEN: usize = 254;

/// Direction byte (TFI) for host -> controller frames
pub const HOST_TO_CONTROLLER: u8 = 0xD4;

/// Direction byte (TFI) for controller -> host frames
pub const CONTROLLER_TO_HOST: u8 = 0xD5;

/// Acknowledgement frame sent by the controller after each command
pub const ACK_FRAME: [u8; 6] = [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00];

/// CRC_A preset value (ISO/IEC 14443-3 Annex B)
pub const CRC_A_PRESET: u16 = 0x6363;

/// Size of a Mifare Classic block
pub const BLOCK_LEN: usize = 16;

/// Size of an Ultralight/NTAG page
pub const PAGE_LEN: usize = 4;

/// NDEF terminator TLV
pub const NDEF_TERMINATOR: u8 = 0xFE;
