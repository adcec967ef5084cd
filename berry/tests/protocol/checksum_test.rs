use berry::protocol::{crc_a, crc_a_bytes, dcs, lcs};

#[test]
fn lcs_and_dcs_examples() {
    assert_eq!(lcs(3), 0xfd);
    assert_eq!(lcs(0), 0x00);
    assert_eq!(lcs(0xff), 0x01);

    assert_eq!(dcs(&[0x01, 0x02, 0x03]), 0xfa);
    assert_eq!(dcs(&[]), 0x00);
    assert_eq!(dcs(&[0xD4, 0x02]), 0x2A);
}

#[test]
fn crc_a_matches_known_tag_frames() {
    // HLTA and READ(0) as they appear on the air
    assert_eq!(crc_a_bytes(&[0x50, 0x00]), [0x57, 0xCD]);
    assert_eq!(crc_a_bytes(&[0x30, 0x00]), [0x02, 0xA8]);
    assert_eq!(crc_a(&[]), 0x6363);
}
