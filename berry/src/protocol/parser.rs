// berry/src/protocol/parser.rs

//! Bounds-checked readers for controller responses. Every accessor fails
//! with [`Error::InvalidLength`] instead of panicking on short data.

use crate::{Error, Result};

fn need(data: &[u8], end: usize) -> Result<()> {
    match data.len() {
        n if n >= end => Ok(()),
        actual => Err(Error::InvalidLength {
            expected: end,
            actual,
        }),
    }
}

/// `len` bytes starting at `idx`.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    need(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    need(data, idx + 1)?;
    Ok(data[idx])
}

/// Fixed-size copy, e.g. a 16-byte block out of an exchange response.
pub fn array_at<const N: usize>(data: &[u8], idx: usize) -> Result<[u8; N]> {
    slice_at(data, idx, N)?
        .try_into()
        .map_err(|_| Error::InvalidLength {
            expected: N,
            actual: data.len().saturating_sub(idx),
        })
}

/// Check that a PN532 response payload answers `command` (its first byte
/// must be `command + 1`).
pub fn expect_response_to(payload: &[u8], command: u8) -> Result<()> {
    let expected = command.wrapping_add(1);
    let actual = byte_at(payload, 0)?;
    if actual != expected {
        return Err(Error::UnexpectedResponse { expected, actual });
    }
    Ok(())
}

/// Received bit count for an MFRC522 FIFO holding `level` bytes whose last
/// byte carries `last_bits` valid bits (0 = all eight).
pub fn received_bits(level: u8, last_bits: u8) -> u16 {
    match last_bits & 0x07 {
        0 => level as u16 * 8,
        n => (level as u16).saturating_sub(1) * 8 + n as u16,
    }
}
