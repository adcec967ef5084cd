// berry/src/card/sector.rs

//! Mifare Classic sector geometry.
//!
//! 1K cards are 16 sectors of 4 blocks. 4K cards keep that layout for
//! the first 32 sectors (blocks 0..128) and switch to 8 sectors of 16
//! blocks above that.

/// First block index that belongs to a 16-block sector
pub const LARGE_SECTOR_START: u8 = 128;

const SMALL_SECTOR_BLOCKS: u8 = 4;
const LARGE_SECTOR_BLOCKS: u8 = 16;

fn blocks_per_sector(block: u8) -> u8 {
    if block < LARGE_SECTOR_START {
        SMALL_SECTOR_BLOCKS
    } else {
        LARGE_SECTOR_BLOCKS
    }
}

/// True for the first block of a sector.
pub fn is_first_block(block: u8) -> bool {
    block % blocks_per_sector(block) == 0
}

/// True for the sector trailer (keys + access bits).
pub fn is_trailer_block(block: u8) -> bool {
    (block as u16 + 1) % blocks_per_sector(block) as u16 == 0
}

/// Sector number containing `block`.
pub fn sector_of(block: u8) -> u8 {
    if block < LARGE_SECTOR_START {
        block / SMALL_SECTOR_BLOCKS
    } else {
        32 + (block - LARGE_SECTOR_START) / LARGE_SECTOR_BLOCKS
    }
}

/// First block of a sector, `None` past sector 39.
pub fn first_block_of(sector: u8) -> Option<u8> {
    if sector < 32 {
        sector.checked_mul(SMALL_SECTOR_BLOCKS)
    } else {
        (sector - 32)
            .checked_mul(LARGE_SECTOR_BLOCKS)?
            .checked_add(LARGE_SECTOR_START)
    }
}
