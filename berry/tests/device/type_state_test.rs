#[path = "../common/mod.rs"]
mod common;

use berry::device::{Device, DeviceBuilder};
use berry::transport::mock::{MockDelay, MockRegisterBus, MockSerialLink};
use berry::types::ControllerKind;
use berry::Error;

#[test]
fn initialize_transitions_and_kind() {
    common::init_logging();
    let link = MockSerialLink::new();
    common::seed_pn532_init(&link);

    let device = DeviceBuilder::new()
        .with_pn532(link.clone(), MockDelay::new())
        .build_uninitialized()
        .unwrap();

    // Uninitialized device exposes its controller kind
    assert_eq!(device.kind(), ControllerKind::Pn532);
    assert!(link.commands().is_empty());

    let initialized = device.initialize().unwrap();
    assert_eq!(initialized.kind(), ControllerKind::Pn532);
    assert_eq!(link.commands()[0], vec![0x02]);
    assert_eq!(link.commands()[1][0], 0x14);
}

#[test]
fn failed_init_is_reported() {
    let link = MockSerialLink::new();
    link.set_failing(true);
    let device = DeviceBuilder::new()
        .with_pn532(link, MockDelay::new())
        .build_uninitialized()
        .unwrap();
    assert!(matches!(device.initialize(), Err(Error::Transport(_))));
}

#[test]
fn rc522_backend_through_new_with_reader() {
    let bus = MockRegisterBus::new();
    let reader = berry::device::models::Rc522::new(bus.clone(), MockDelay::new());
    let device = Device::new_with_reader(Box::new(reader));
    assert_eq!(device.kind(), ControllerKind::Rc522);
    device.initialize().unwrap();
    assert_eq!(bus.soft_resets(), 1);
}

#[test]
fn no_controller_selected() {
    assert!(matches!(
        DeviceBuilder::default().build(),
        Err(Error::DeviceNotFound)
    ));
}
