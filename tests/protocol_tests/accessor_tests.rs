//! Accessor Tests
//!
//! Tests for narrowing decoded replies to typed values.

use std::error::Error;
use std::io::Cursor;

use rego::error::ShapeMismatch;
use rego::protocol::{Decoder, Message, RespType};
use rego::RegoError;

fn decode(input: &[u8]) -> Message {
    Decoder::new(Cursor::new(input.to_vec())).decode_next().unwrap()
}

// =============================================================================
// Successful Narrowing
// =============================================================================

#[test]
fn test_as_text_on_bulk_string() {
    let msg = decode(b"$5\r\nhello\r\n");

    assert_eq!(msg.resp_type(), RespType::BulkString);
    assert_eq!(msg.as_text().unwrap().as_deref(), Some("hello"));
}

#[test]
fn test_as_text_on_simple_string() {
    let msg = decode(b"+PONG\r\n");
    assert_eq!(msg.as_text().unwrap().as_deref(), Some("PONG"));
}

#[test]
fn test_as_integer() {
    let msg = decode(b":42\r\n");
    assert_eq!(msg.as_integer().unwrap(), 42);
}

#[test]
fn test_as_error() {
    let msg = decode(b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n");
    let err = msg.as_error().unwrap();

    assert_eq!(err.kind(), "WRONGTYPE");
    assert_eq!(
        err.message(),
        "Operation against a key holding the wrong kind of value"
    );
    assert_eq!(
        err.to_string(),
        "WRONGTYPE Operation against a key holding the wrong kind of value"
    );
}

#[test]
fn test_as_error_without_message() {
    let msg = decode(b"-ERR\r\n");
    let err = msg.as_error().unwrap();

    assert_eq!(err.kind(), "ERR");
    assert_eq!(err.message(), "");
}

#[test]
fn test_as_array() {
    let msg = decode(b"*2\r\n$3\r\nfoo\r\n:3\r\n");
    let elements = msg.as_array().unwrap().unwrap();

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].as_text().unwrap().as_deref(), Some("foo"));
    assert_eq!(elements[1].as_integer().unwrap(), 3);
}

#[test]
fn test_accessors_are_repeatable() {
    let msg = decode(b":7\r\n");

    assert_eq!(msg.as_integer().unwrap(), 7);
    assert_eq!(msg.as_integer().unwrap(), 7);
    assert!(msg.as_text().is_err());
    assert_eq!(msg.as_integer().unwrap(), 7);
}

// =============================================================================
// Null vs Empty
// =============================================================================

#[test]
fn test_null_bulk_is_not_accessor_equivalent_to_empty_bulk() {
    let null = decode(b"$-1\r\n");
    let empty = decode(b"$0\r\n\r\n");

    assert_eq!(null.as_text().unwrap(), None);
    assert_eq!(empty.as_text().unwrap().as_deref(), Some(""));
    assert_ne!(null.as_bytes().unwrap(), empty.as_bytes().unwrap());
    assert!(null.is_null());
    assert!(!empty.is_null());
}

#[test]
fn test_null_array_is_not_empty_array() {
    let null = decode(b"*-1\r\n");
    let empty = decode(b"*0\r\n");

    assert!(null.as_array().unwrap().is_none());
    assert_eq!(empty.as_array().unwrap().map(|e| e.len()), Some(0));
}

// =============================================================================
// Shape Mismatch
// =============================================================================

#[test]
fn test_as_integer_on_simple_string() {
    let msg = decode(b"+OK\r\n");
    let err = msg.as_integer().unwrap_err();

    assert_eq!(err.got(), RespType::SimpleString);
    assert!(err.expected().contains(&RespType::Integer));
    assert_eq!(err.to_string(), "got SimpleString but expected Integer");
}

#[test]
fn test_as_text_mismatch_lists_both_string_types() {
    let msg = decode(b":1\r\n");
    let err = msg.as_text().unwrap_err();

    assert_eq!(err.got(), RespType::Integer);
    assert_eq!(
        err.expected(),
        &[RespType::SimpleString, RespType::BulkString]
    );
    assert_eq!(
        err.to_string(),
        "got Integer but expected SimpleString or BulkString"
    );
}

#[test]
fn test_as_error_on_array() {
    let msg = decode(b"*0\r\n");
    let err = msg.as_error().unwrap_err();

    assert_eq!(err.got(), RespType::Array);
    assert_eq!(err.expected(), &[RespType::Error]);
}

#[test]
fn test_as_array_on_bulk_string() {
    let msg = decode(b"$2\r\nhi\r\n");
    let err = msg.as_array().unwrap_err();

    assert_eq!(err.got(), RespType::BulkString);
    assert_eq!(err.expected(), &[RespType::Array]);
}

#[test]
fn test_as_bytes_on_simple_string() {
    let msg = decode(b"+OK\r\n");
    let err = msg.as_bytes().unwrap_err();

    assert_eq!(err.expected(), &[RespType::BulkString]);
}

#[test]
fn test_parse_error_source_is_shape_mismatch() {
    let msg = decode(b"+OK\r\n");
    let err = msg.as_integer().unwrap_err();

    assert_eq!(err.cause(), ShapeMismatch);
    let source = err.source().expect("ParseError carries a source");
    assert!(source.downcast_ref::<ShapeMismatch>().is_some());
}

#[test]
fn test_parse_error_converts_into_rego_error() {
    fn first_integer(msg: &Message) -> rego::Result<i64> {
        Ok(msg.as_integer()?)
    }

    let err = first_integer(&decode(b"+OK\r\n")).unwrap_err();
    assert!(matches!(err, RegoError::Parse(_)));
    assert!(!err.is_stream_corruption());
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_scalars() {
    assert_eq!(decode(b"+OK\r\n").to_string(), "OK");
    assert_eq!(decode(b"-ERR no\r\n").to_string(), "ERR no");
    assert_eq!(decode(b":-12\r\n").to_string(), "-12");
    assert_eq!(decode(b"$3\r\nabc\r\n").to_string(), "abc");
    assert_eq!(decode(b"$-1\r\n").to_string(), "(nil)");
}

#[test]
fn test_render_nested_array() {
    let msg = decode(b"*3\r\n:1\r\n*2\r\n+a\r\n$1\r\nb\r\n*0\r\n");
    assert_eq!(msg.to_string(), "[1,[a,b],[]]");
}
