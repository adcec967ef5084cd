// Shared tag identities and payloads for the integration tests

use berry::types::{BlockData, MifareKey, PageData};

pub const CLASSIC_UID: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];
pub const CLASSIC_ATQA: [u8; 2] = [0x04, 0x00];
pub const CLASSIC_SAK: u8 = 0x08;

pub const NTAG_UID: [u8; 7] = [0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
pub const NTAG_ATQA: [u8; 2] = [0x44, 0x00];
pub const NTAG_SAK: u8 = 0x00;

pub fn transport_key() -> MifareKey {
    MifareKey::DEFAULT
}

pub fn sample_block(fill: u8) -> BlockData {
    BlockData::from_bytes([fill; 16])
}

pub fn counting_block() -> [u8; 16] {
    let mut b = [0u8; 16];
    for (i, v) in b.iter_mut().enumerate() {
        *v = i as u8;
    }
    b
}

pub fn sample_page() -> PageData {
    PageData::from_bytes([0x01, 0x02, 0x03, 0x04])
}

/// InDataExchange answer: status 0 followed by `data`
pub fn exchange_ok(data: &[u8]) -> Vec<u8> {
    let mut resp = vec![0x41, 0x00];
    resp.extend_from_slice(data);
    resp
}
