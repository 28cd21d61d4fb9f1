//! Tests for wire packet parsing

use bytes::Bytes;

use crate::{MessageId, Packet, ProtocolError, HEADER_LEN, MAX_PACKET_LEN};

#[test]
fn test_compose_parse_roundtrip() {
    let frame = Packet::compose(MessageId::new(0x08A1), 42, 1_700_000, b"hello");
    let packet = Packet::parse(Bytes::from(frame)).unwrap();

    assert_eq!(packet.mid(), MessageId::new(0x08A1));
    assert_eq!(packet.sequence(), 42);
    assert_eq!(packet.timestamp_secs(), 1_700_000);
    assert_eq!(packet.payload(), b"hello");
    assert_eq!(packet.len(), HEADER_LEN + 5);
}

#[test]
fn test_header_only_frame() {
    let frame = Packet::compose(MessageId::new(1), 0, 0, b"");
    let packet = Packet::parse(Bytes::from(frame)).unwrap();

    assert!(packet.is_empty());
    assert_eq!(packet.payload(), b"");
}

#[test]
fn test_too_short_rejected() {
    let err = Packet::parse(Bytes::from_static(&[0u8; 5])).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::TooShort {
            actual: 5,
            expected: HEADER_LEN
        }
    );
}

#[test]
fn test_length_mismatch_rejected() {
    let mut frame = Packet::compose(MessageId::new(1), 0, 0, b"abcd");
    // Truncate the payload without fixing the length field
    frame.truncate(frame.len() - 2);

    let err = Packet::parse(Bytes::from(frame)).unwrap_err();
    assert!(matches!(err, ProtocolError::LengthMismatch { .. }));
}

#[test]
fn test_too_long_rejected() {
    let frame = vec![0u8; MAX_PACKET_LEN + 1];
    let err = Packet::parse(Bytes::from(frame)).unwrap_err();
    assert!(matches!(err, ProtocolError::TooLong { .. }));
}

#[test]
fn test_frame_bytes_are_contiguous() {
    let frame = Packet::compose(MessageId::new(0x0AB1), 3, 99, b"xyz");
    let expected = frame.clone();
    let packet = Packet::parse(Bytes::from(frame)).unwrap();

    assert_eq!(packet.as_bytes(), &expected[..]);
}
