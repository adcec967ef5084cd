#[path = "../common/mod.rs"]
mod common;

use berry::card::TagFamily;
use berry::device::models::Pn532;
use berry::transport::mock::{MockDelay, MockSerialLink, Reply};
use berry::types::KeyType;
use berry::{Error, ErrorKind};

use common::fixtures::*;

#[test]
fn ready_wait_counts_polls() {
    let link = MockSerialLink::new();
    let delay = MockDelay::new();
    let mut pn = Pn532::new(link.clone(), delay.clone());

    assert!(!pn.wait_ready(25).unwrap());
    assert_eq!(link.status_reads(), 3);
    let waits = delay.ms_calls().iter().filter(|&&ms| ms == 10).count();
    assert_eq!(waits, 2);
}

#[test]
fn oversized_exchange_rejected_before_io() {
    let link = MockSerialLink::new();
    let mut pn = Pn532::new(link.clone(), MockDelay::new());
    let err = pn.in_data_exchange(&[0u8; 63]).unwrap_err();
    assert!(matches!(
        err,
        Error::PayloadTooLong {
            max: 62,
            actual: 63,
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Parameter);
    assert!(link.written_frames().is_empty());
}

#[test]
fn missing_ack_and_silence() {
    let link = MockSerialLink::new();
    let mut pn = Pn532::new(link.clone(), MockDelay::new());

    link.push_reply(Reply::Nack);
    assert!(matches!(pn.firmware_version(), Err(Error::NoAck)));

    link.push_reply(Reply::Silent);
    assert!(!pn.send_command_check_ack(&[0x02], 50).unwrap());
}

#[test]
fn classic_discover_auth_read() {
    common::init_logging();
    let (mut dev, link, _) = common::initialized_pn532_device().unwrap();
    common::seed_pn532_target(&link, CLASSIC_ATQA, CLASSIC_SAK, &CLASSIC_UID);

    let mut tag = dev.discover().unwrap().expect("tag in field");
    assert_eq!(tag.uid().as_bytes(), &CLASSIC_UID);
    assert_eq!(tag.family(), TagFamily::MifareClassic);

    link.push_frame(&exchange_ok(&[]));
    dev.authenticate(&mut tag, 4, KeyType::A, &transport_key())
        .unwrap();

    link.push_frame(&exchange_ok(&counting_block()));
    let block = dev.read_block(&tag, 6).unwrap();
    assert_eq!(block.as_bytes(), &counting_block());
    assert_eq!(link.last_command().unwrap(), vec![0x40, 0x01, 0x30, 0x06]);
}

#[test]
fn empty_field_is_not_an_error() {
    let (mut dev, _link, _) = common::initialized_pn532_device().unwrap();
    // ACK only: the controller never reports a target
    assert!(dev.discover().unwrap().is_none());
}

#[test]
fn ntag_uri_written_page_by_page() {
    let (mut dev, link, _) = common::initialized_pn532_device().unwrap();
    common::seed_pn532_target(&link, NTAG_ATQA, NTAG_SAK, &NTAG_UID);
    let tag = dev.discover().unwrap().unwrap();
    assert_eq!(tag.family(), TagFamily::Ultralight);

    // 3 header pages, one URI page, terminator page
    for _ in 0..5 {
        link.push_frame(&exchange_ok(&[]));
    }
    dev.write_ndef_uri(&tag, 0x04, b"a.io").unwrap();

    let writes: Vec<_> = link
        .commands()
        .into_iter()
        .filter(|c| c.len() == 8 && c[2] == 0xA2)
        .collect();
    assert_eq!(writes.len(), 5);
    assert_eq!(writes[0][3], 4);
    assert_eq!(&writes[3][4..], b"a.io");
    assert_eq!(writes[4][3], 8);
}

#[test]
fn tag_error_status_invalidates_tag() {
    let (mut dev, link, _) = common::initialized_pn532_device().unwrap();
    common::seed_pn532_target(&link, NTAG_ATQA, NTAG_SAK, &NTAG_UID);
    let tag = dev.discover().unwrap().unwrap();

    link.push_frame(&[0x41, 0x01]);
    assert!(matches!(
        dev.read_page(&tag, 4),
        Err(Error::TagStatus { status: 0x01 })
    ));
    assert!(matches!(dev.read_page(&tag, 4), Err(Error::StaleTag)));
}

#[test]
fn sam_configuration_wire_frame() -> anyhow::Result<()> {
    let link = MockSerialLink::new();
    let mut pn = Pn532::new(link.clone(), MockDelay::new());
    link.push_frame(&[0x15]);
    pn.sam_config()?;

    let expected = hex::decode("0000ff05fbd4140114010200")?;
    assert_eq!(link.written_frames()[0], expected);
    Ok(())
}
