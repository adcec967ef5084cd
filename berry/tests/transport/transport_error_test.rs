#[path = "../common/mod.rs"]
mod common;

use berry::device::models::{Pn532, Rc522};
use berry::transport::mock::{MockDelay, MockRegisterBus, MockSerialLink};
use berry::{Error, ErrorKind};

#[test]
fn serial_link_failure_is_transport_error() {
    let link = MockSerialLink::new();
    link.set_failing(true);
    let mut pn = Pn532::new(link, MockDelay::new());
    let err = pn.sam_config().unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn register_failure_is_transport_error() {
    let bus = MockRegisterBus::new();
    bus.fail_on_register(Some(0x37));
    let mut rc = Rc522::new(bus, MockDelay::new());
    let err = rc.version().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn device_discover_propagates_transport_errors() {
    let (mut dev, bus, _) = common::initialized_rc522_device().unwrap();
    bus.fail_on_register(Some(0x04));
    assert!(matches!(dev.discover(), Err(Error::Transport(_))));
}
