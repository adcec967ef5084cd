// berry/src/device/models/limits.rs

//! Memory bounds enforced before any bus traffic.

use crate::card::sector;
use crate::{Error, Result};

/// Pages addressable on a Mifare Ultralight
pub const ULTRALIGHT_PAGES: u8 = 64;

/// Pages readable on the largest NTAG2xx (NTAG216)
pub const NTAG_READ_PAGES: u8 = 231;

/// First NTAG user page
pub const NTAG_FIRST_USER_PAGE: u8 = 4;

/// Last NTAG216 user page
pub const NTAG_LAST_USER_PAGE: u8 = 225;

/// Blocks reachable through the MFRC522 block path (Classic 1K)
pub const RC522_CLASSIC_BLOCKS: u8 = 64;

/// Sectors that may carry an NDEF URI record (sector 0 is the MAD)
pub const NDEF_FIRST_SECTOR: u8 = 1;
pub const NDEF_LAST_SECTOR: u8 = 15;

pub fn check_ntag_read(page: u8) -> Result<()> {
    if page >= NTAG_READ_PAGES {
        return Err(Error::out_of_range("page", page as u16, 0, NTAG_READ_PAGES as u16 - 1));
    }
    Ok(())
}

pub fn check_ntag_write(page: u8) -> Result<()> {
    if !(NTAG_FIRST_USER_PAGE..=NTAG_LAST_USER_PAGE).contains(&page) {
        return Err(Error::out_of_range(
            "page",
            page as u16,
            NTAG_FIRST_USER_PAGE as u16,
            NTAG_LAST_USER_PAGE as u16,
        ));
    }
    Ok(())
}

pub fn check_rc522_block(block: u8) -> Result<()> {
    if block >= RC522_CLASSIC_BLOCKS {
        return Err(Error::out_of_range(
            "block",
            block as u16,
            0,
            RC522_CLASSIC_BLOCKS as u16 - 1,
        ));
    }
    Ok(())
}

pub fn check_ndef_sector(sector: u8) -> Result<()> {
    if !(NDEF_FIRST_SECTOR..=NDEF_LAST_SECTOR).contains(&sector) {
        return Err(Error::out_of_range(
            "sector",
            sector as u16,
            NDEF_FIRST_SECTOR as u16,
            NDEF_LAST_SECTOR as u16,
        ));
    }
    Ok(())
}

/// First block of an NDEF-capable sector, rejecting the sector before
/// its block number is computed.
pub fn ndef_sector_first_block(sector: u8) -> Result<u8> {
    check_ndef_sector(sector)?;
    sector::first_block_of(sector).ok_or_else(|| {
        Error::out_of_range(
            "sector",
            sector as u16,
            NDEF_FIRST_SECTOR as u16,
            NDEF_LAST_SECTOR as u16,
        )
    })
}
