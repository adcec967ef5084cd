// berry/src/protocol/ndef.rs

//! Memory layouts for NDEF URI records.
//!
//! Both layouts start with an NDEF Message TLV wrapping a single short URI
//! record and end with the terminator TLV (0xFE). Where the terminator lands
//! depends on how the URI bytes fall across 16-byte blocks (Mifare Classic)
//! or 4-byte pages (NTAG2xx / Ultralight).

use crate::constants::{BLOCK_LEN, NDEF_TERMINATOR, PAGE_LEN};
use crate::{Error, Result};

/// Longest URI that fits the three data blocks of one Classic sector
pub const CLASSIC_URI_MAX_LEN: usize = 38;

/// Longest URI for NTAG2xx: `len + 1` must stay within 256 - 12 bytes
pub const NTAG_URI_MAX_LEN: usize = 256 - 12 - 1;

/// First page written by the NTAG layout (pages 0..=3 hold UID, lock and CC)
pub const NTAG_FIRST_PAGE: u8 = 4;

/// URI bytes that fit in the first Classic block after the record header
const CLASSIC_FIRST_BLOCK_URI: usize = 7;

/// URI bytes that fit in the first two Classic blocks
const CLASSIC_TWO_BLOCK_URI: usize = CLASSIC_FIRST_BLOCK_URI + BLOCK_LEN;

/// Sector trailer for NDEF sectors: key A D3 F7 D3 F7 D3 F7, access bits
/// 7F 07 88 with GPB 0x40, key B FF..FF
pub const CLASSIC_NDEF_TRAILER: [u8; 16] = [
    0xD3, 0xF7, 0xD3, 0xF7, 0xD3, 0xF7, 0x7F, 0x07, 0x88, 0x40, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// MAD sector (sector 0) blocks 1..=3 marking sectors 1..15 as NDEF
pub const CLASSIC_MAD_BLOCKS: [[u8; 16]; 3] = [
    [
        0x14, 0x01, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03,
        0xE1,
    ],
    [
        0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03, 0xE1, 0x03,
        0xE1,
    ],
    [
        0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0x78, 0x77, 0x88, 0xC1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF,
    ],
];

/// The four blocks of one Classic sector carrying a URI record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicUriLayout {
    pub blocks: [[u8; 16]; 3],
    pub trailer: [u8; 16],
}

impl ClassicUriLayout {
    /// Number of data blocks holding record bytes or the terminator.
    pub fn used_blocks(&self) -> usize {
        self.blocks
            .iter()
            .rposition(|b| b.iter().any(|&x| x != 0))
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Sector blocks in write order: three data blocks then the trailer.
    pub fn iter(&self) -> impl Iterator<Item = &[u8; 16]> {
        self.blocks.iter().chain(std::iter::once(&self.trailer))
    }
}

fn check_uri_len(uri: &[u8], max: usize) -> Result<()> {
    if uri.is_empty() {
        return Err(Error::InvalidLength {
            expected: 1,
            actual: 0,
        });
    }
    if uri.len() > max {
        return Err(Error::PayloadTooLong {
            max,
            actual: uri.len(),
        });
    }
    Ok(())
}

/// Pack a URI record (`prefix` is the URI identifier code, 0x01 =
/// "http://www.") into one Classic sector.
pub fn classic_uri_layout(prefix: u8, uri: &[u8]) -> Result<ClassicUriLayout> {
    check_uri_len(uri, CLASSIC_URI_MAX_LEN)?;
    let len = uri.len() as u8;

    let mut blocks = [[0u8; BLOCK_LEN]; 3];
    blocks[0][..9].copy_from_slice(&[0x00, 0x00, 0x03, len + 5, 0xD1, 0x01, len + 1, 0x55, prefix]);

    // Flatten the URI + terminator into the 39 free bytes following the
    // header; the tiering (<=6, 7, 8..=22, 23, 24..) falls out of where
    // byte 7 and byte 23 land.
    let mut tail = Vec::with_capacity(uri.len() + 1);
    tail.extend_from_slice(uri);
    tail.push(NDEF_TERMINATOR);

    let first = tail.len().min(CLASSIC_FIRST_BLOCK_URI);
    blocks[0][9..9 + first].copy_from_slice(&tail[..first]);
    if tail.len() > CLASSIC_FIRST_BLOCK_URI {
        let end = tail.len().min(CLASSIC_TWO_BLOCK_URI);
        blocks[1][..end - CLASSIC_FIRST_BLOCK_URI]
            .copy_from_slice(&tail[CLASSIC_FIRST_BLOCK_URI..end]);
    }
    if tail.len() > CLASSIC_TWO_BLOCK_URI {
        blocks[2][..tail.len() - CLASSIC_TWO_BLOCK_URI]
            .copy_from_slice(&tail[CLASSIC_TWO_BLOCK_URI..]);
    }

    Ok(ClassicUriLayout {
        blocks,
        trailer: CLASSIC_NDEF_TRAILER,
    })
}

/// Pack a URI record into NTAG2xx pages starting at page 4. The header
/// carries the Lock Control TLV that must precede the NDEF message.
pub fn ntag_uri_pages(prefix: u8, uri: &[u8]) -> Result<Vec<[u8; 4]>> {
    check_uri_len(uri, NTAG_URI_MAX_LEN)?;
    let len = uri.len() as u8;

    let head: [u8; 12] = [
        // Lock Control TLV: position 0xA0, 16 lock bits, 4-byte pages
        0x01, 0x03, 0xA0, 0x10, 0x44, //
        // NDEF Message TLV + short well-known URI record
        0x03, len + 5, 0xD1, 0x01, len + 1, 0x55, prefix,
    ];

    let mut pages: Vec<[u8; 4]> = head
        .chunks(PAGE_LEN)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect();

    let mut rest = uri;
    loop {
        let mut page = [0u8; PAGE_LEN];
        if rest.len() < PAGE_LEN {
            page[..rest.len()].copy_from_slice(rest);
            page[rest.len()] = NDEF_TERMINATOR;
            pages.push(page);
            break;
        }
        page.copy_from_slice(&rest[..PAGE_LEN]);
        pages.push(page);
        rest = &rest[PAGE_LEN..];
        if rest.is_empty() {
            pages.push([NDEF_TERMINATOR, 0, 0, 0]);
            break;
        }
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(n: usize) -> Vec<u8> {
        (0..n).map(|i| b'a' + (i % 26) as u8).collect()
    }

    #[test]
    fn classic_header_fields() {
        let l = classic_uri_layout(0x01, b"abc").unwrap();
        assert_eq!(&l.blocks[0][..9], &[0, 0, 0x03, 8, 0xD1, 0x01, 4, 0x55, 0x01]);
        assert_eq!(&l.blocks[0][9..12], b"abc");
        assert_eq!(l.blocks[0][12], NDEF_TERMINATOR);
        assert_eq!(l.used_blocks(), 1);
        assert_eq!(l.trailer, CLASSIC_NDEF_TRAILER);
    }

    #[test]
    fn classic_full_three_blocks() {
        let u = uri(38);
        let l = classic_uri_layout(0x00, &u).unwrap();
        assert_eq!(&l.blocks[1][..], &u[7..23]);
        assert_eq!(&l.blocks[2][..15], &u[23..]);
        assert_eq!(l.blocks[2][15], NDEF_TERMINATOR);
        assert_eq!(l.iter().count(), 4);
    }

    #[test]
    fn classic_rejects_empty() {
        assert!(matches!(
            classic_uri_layout(0x01, b""),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn ntag_exact_multiple_gets_terminator_page() {
        let pages = ntag_uri_pages(0x03, b"abcdefgh").unwrap();
        // 3 header pages + 2 full pages + terminator page
        assert_eq!(pages.len(), 6);
        assert_eq!(pages[3], *b"abcd");
        assert_eq!(pages[4], *b"efgh");
        assert_eq!(pages[5], [NDEF_TERMINATOR, 0, 0, 0]);
    }

    #[test]
    fn ntag_partial_page_is_padded() {
        let pages = ntag_uri_pages(0x03, b"abcdef").unwrap();
        assert_eq!(pages.len(), 5);
        assert_eq!(pages[4], [b'e', b'f', NDEF_TERMINATOR, 0]);
        assert_eq!(pages[0], [0x01, 0x03, 0xA0, 0x10]);
        assert_eq!(pages[1], [0x44, 0x03, 6 + 5, 0xD1]);
        assert_eq!(pages[2], [0x01, 6 + 1, 0x55, 0x03]);
    }

    #[test]
    fn ntag_length_limit() {
        assert!(ntag_uri_pages(0x00, &uri(NTAG_URI_MAX_LEN)).is_ok());
        assert!(matches!(
            ntag_uri_pages(0x00, &uri(NTAG_URI_MAX_LEN + 1)),
            Err(Error::PayloadTooLong { .. })
        ));
    }
}
