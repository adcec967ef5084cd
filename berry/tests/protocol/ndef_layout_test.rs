use berry::constants::NDEF_TERMINATOR;
use berry::protocol::ndef::{classic_uri_layout, ntag_uri_pages, CLASSIC_URI_MAX_LEN};
use berry::Error;

fn uri(n: usize) -> Vec<u8> {
    (0..n).map(|i| b'0' + (i % 10) as u8).collect()
}

#[test]
fn classic_block_tiers() {
    // (uri length, blocks carrying data, where the terminator lands)
    let cases = [(6, 1, (0, 15)), (7, 2, (1, 0)), (22, 2, (1, 15)), (23, 3, (2, 0))];
    for (len, used, (block, offset)) in cases {
        let layout = classic_uri_layout(0x04, &uri(len)).unwrap();
        assert_eq!(layout.used_blocks(), used, "len {}", len);
        assert_eq!(layout.blocks[block][offset], NDEF_TERMINATOR, "len {}", len);
    }
}

#[test]
fn classic_limit() {
    assert!(classic_uri_layout(0x04, &uri(CLASSIC_URI_MAX_LEN)).is_ok());
    assert!(matches!(
        classic_uri_layout(0x04, &uri(39)),
        Err(Error::PayloadTooLong {
            max: 38,
            actual: 39,
        })
    ));
}

#[test]
fn ntag_uri_round_trips_through_pages() {
    let u = b"example.com/path";
    let pages = ntag_uri_pages(0x04, u).unwrap();
    let flat: Vec<u8> = pages.iter().flatten().copied().collect();
    assert_eq!(&flat[12..12 + u.len()], u);
    assert_eq!(flat[12 + u.len()], NDEF_TERMINATOR);
    assert_eq!(flat[6], u.len() as u8 + 5);
}
