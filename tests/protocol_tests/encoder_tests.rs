//! Encoder Tests
//!
//! Tests for request framing and its round trip through the decoder.

use std::io::Cursor;

use rego::protocol::{encode_command, write_command, Decoder, RespType};

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_set() {
    let encoded = encode_command(&["SET", "key", "value"]);
    assert_eq!(
        encoded,
        b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n".to_vec()
    );
}

#[test]
fn test_wire_format_no_args() {
    let args: [&str; 0] = [];
    assert_eq!(encode_command(&args), b"*0\r\n".to_vec());
}

#[test]
fn test_wire_format_empty_arg() {
    assert_eq!(encode_command(&["ECHO", ""]), b"*2\r\n$4\r\nECHO\r\n$0\r\n\r\n".to_vec());
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_bulk_round_trip_with_embedded_crlf() {
    let payload: &[u8] = b"line one\r\nline two\r\n\0\xff";
    let encoded = encode_command(&[payload]);

    let mut decoder = Decoder::new(Cursor::new(encoded));
    let msg = decoder.decode_next().unwrap();

    let elements = msg.as_array().unwrap().unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].resp_type(), RespType::BulkString);

    let decoded = elements[0].as_bytes().unwrap().unwrap();
    assert_eq!(decoded, payload);
    assert_eq!(decoded.len(), payload.len());
}

#[test]
fn test_stream_write_multiple_commands() {
    let commands: Vec<Vec<&str>> = vec![
        vec!["PING"],
        vec!["SET", "k1", "v1"],
        vec!["GET", "k1"],
    ];

    let mut buffer = Vec::new();
    for cmd in &commands {
        write_command(&mut buffer, cmd).unwrap();
    }

    let mut decoder = Decoder::new(Cursor::new(buffer));
    for expected in &commands {
        let msg = decoder.decode_next().unwrap();
        let args: Vec<String> = msg
            .as_array()
            .unwrap()
            .unwrap()
            .iter()
            .map(|m| m.as_text().unwrap().unwrap().into_owned())
            .collect();
        assert_eq!(&args, expected);
    }
}
