// berry/src/protocol/checksum.rs

use crate::constants::CRC_A_PRESET;

/// Compute Length Checksum (LCS) for a controller frame
/// LCS = 0x100 - length (mod 256)
pub fn lcs(len: u8) -> u8 {
    0u8.wrapping_sub(len)
}

/// Compute Data Checksum (DCS) for a controller frame
/// DCS = 0x100 - (sum(bytes) & 0xff)
pub fn dcs(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}

/// DCS over the direction byte followed by the payload, i.e.
/// `(~(tfi + Σpayload)) + 1`.
pub fn frame_dcs(tfi: u8, payload: &[u8]) -> u8 {
    let sum = payload.iter().fold(tfi, |acc, &b| acc.wrapping_add(b));
    (!sum).wrapping_add(1)
}

/// ISO/IEC 14443-3 CRC_A: preset 0x6363, reflected polynomial 0x8408, no
/// final XOR. This is what the MFRC522 coprocessor computes with
/// ModeReg = 0x3D and what tags append to their frames.
pub fn crc_a(data: &[u8]) -> u16 {
    data.iter().fold(CRC_A_PRESET, |crc, &b| {
        let mut bt = b ^ (crc & 0x00ff) as u8;
        bt ^= bt << 4;
        let bt = bt as u16;
        (crc >> 8) ^ (bt << 8) ^ (bt << 3) ^ (bt >> 4)
    })
}

/// CRC_A as transmitted on the air (low byte first).
pub fn crc_a_bytes(data: &[u8]) -> [u8; 2] {
    crc_a(data).to_le_bytes()
}
