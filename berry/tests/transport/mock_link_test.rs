#[path = "../common/mod.rs"]
mod common;

use berry::device::models::{Pn532, Rc522};
use berry::protocol::Frame;
use berry::transport::mock::{MockDelay, MockRegisterBus, MockSerialLink, MOCK_VERSION};
use berry::transport::{Delay, RegisterBus, SerialLink};

#[test]
fn boxed_link_and_delay_drive_the_pn532() {
    let link = MockSerialLink::new();
    let delay = MockDelay::new();
    let boxed_link: Box<dyn SerialLink> = Box::new(link.clone());
    let boxed_delay: Box<dyn Delay> = Box::new(delay.clone());
    let mut pn = Pn532::new(boxed_link, boxed_delay);

    link.push_frame(&berry::test_support::PN532_FIRMWARE_REPLY);
    let fw = pn.firmware_version().unwrap();
    assert_eq!(fw.as_u32(), 0x3201_0607);

    // the bit-banged stream decodes back into the exact command frame
    assert_eq!(link.written_frames()[0], Frame::command(&[0x02]).unwrap());
    // one select settle per transaction
    assert!(delay.ms_calls().iter().filter(|&&ms| ms == 2).count() >= 4);
    assert_eq!(link.pending(), 0);
}

#[test]
fn boxed_bus_drives_the_rc522() {
    let bus = MockRegisterBus::new();
    let boxed: Box<dyn RegisterBus> = Box::new(bus.clone());
    let mut rc = Rc522::new(boxed, MockDelay::new());
    assert_eq!(rc.version().unwrap(), MOCK_VERSION);
    rc.enable_antenna().unwrap();
    assert_eq!(bus.peek(0x14) & 0x03, 0x03);
}
