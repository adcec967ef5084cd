use berry::protocol::{Direction, Frame};
use berry::{Error, ErrorKind};

#[test]
fn firmware_request_wire_bytes() {
    let frame = Frame::command(&[0x02]).unwrap();
    assert_eq!(frame, vec![0x00, 0x00, 0xFF, 0x02, 0xFE, 0xD4, 0x02, 0x2A, 0x00]);
}

#[test]
fn decode_prefix_ignores_padding() {
    let mut buf = Frame::encode(Direction::ControllerToHost, &[0x03, 0x32, 0x01, 0x06, 0x07])
        .unwrap();
    let len = buf.len();
    buf.resize(64, 0);
    let (frame, used) = Frame::decode_prefix(&buf).unwrap();
    assert_eq!(used, len);
    assert_eq!(frame.direction, Direction::ControllerToHost);
    assert_eq!(frame.payload, vec![0x03, 0x32, 0x01, 0x06, 0x07]);
}

#[test]
fn corrupted_checksums_are_framing_errors() {
    let mut frame = Frame::command(&[0x4A, 0x01, 0x00]).unwrap();
    let dcs_at = frame.len() - 2;
    frame[dcs_at] ^= 0xFF;
    let err = Frame::decode(&frame).unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Framing);

    let mut frame = Frame::command(&[0x4A, 0x01, 0x00]).unwrap();
    frame[4] = 0x00;
    assert!(matches!(
        Frame::decode(&frame),
        Err(Error::ChecksumMismatch { .. })
    ));
}

#[test]
fn ack_detection() {
    assert!(Frame::is_ack(&[0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00]));
    assert!(!Frame::is_ack(&[0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00]));
}

#[test]
fn oversized_payload_rejected() {
    assert!(matches!(
        Frame::command(&[0u8; 255]),
        Err(Error::PayloadTooLong { max: 254, .. })
    ));
}
