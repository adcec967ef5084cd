//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize the mock controller setup so tests across the
//! crate and the tests/ directory seed handshakes the same way.
#![allow(dead_code)]

use crate::device::{Device, DeviceBuilder, Initialized};
use crate::protocol::mifare;
use crate::transport::mock::{MockDelay, MockRegisterBus, MockSerialLink, TagReply};
use crate::Result;

/// GetFirmwareVersion answer of a PN532 v1.6
#[doc(hidden)]
pub const PN532_FIRMWARE_REPLY: [u8; 5] = [0x03, 0x32, 0x01, 0x06, 0x07];

/// Queue the replies the PN532 init sequence consumes (firmware, SAM).
#[doc(hidden)]
pub fn seed_pn532_init(link: &MockSerialLink) {
    link.push_frame(&PN532_FIRMWARE_REPLY);
    link.push_frame(&[0x15]);
}

/// Queue an InListPassiveTarget answer for one type A target.
#[doc(hidden)]
pub fn seed_pn532_target(link: &MockSerialLink, atqa: [u8; 2], sak: u8, uid: &[u8]) {
    let mut resp = vec![0x4B, 0x01, 0x01, atqa[0], atqa[1], sak, uid.len() as u8];
    resp.extend_from_slice(uid);
    link.push_frame(&resp);
}

/// Queue the tag answers for REQA + single-level anticollision/select.
#[doc(hidden)]
pub fn seed_rc522_target(bus: &MockRegisterBus, atqa: [u8; 2], sak: u8, uid: [u8; 4]) {
    bus.push_reply(TagReply::bytes(&atqa));
    let mut anticoll = uid.to_vec();
    anticoll.push(mifare::bcc(&uid));
    bus.push_reply(TagReply::bytes(&anticoll));
    bus.push_reply(TagReply::with_crc(&[sak]));
}

/// Initialized PN532-backed Device plus handles to its mocks.
#[doc(hidden)]
pub fn initialized_pn532_device() -> Result<(Device<Initialized>, MockSerialLink, MockDelay)> {
    let link = MockSerialLink::new();
    let delay = MockDelay::new();
    seed_pn532_init(&link);
    let device = DeviceBuilder::new()
        .with_pn532(link.clone(), delay.clone())
        .build()?;
    Ok((device, link, delay))
}

/// Initialized RC522-backed Device plus handles to its mocks. The bus log
/// is cleared after the init sequence.
#[doc(hidden)]
pub fn initialized_rc522_device() -> Result<(Device<Initialized>, MockRegisterBus, MockDelay)> {
    let bus = MockRegisterBus::new();
    let delay = MockDelay::new();
    let device = DeviceBuilder::new()
        .with_rc522(bus.clone(), delay.clone())
        .build()?;
    bus.clear_log();
    delay.clear();
    Ok((device, bus, delay))
}
