//! Typed accessors
//!
//! Narrow a decoded [`Message`] to the shape the caller expects. Every accessor
//! either returns the value or a [`ParseError`] naming the actual and the
//! acceptable types; none of them mutate or panic.

use std::borrow::Cow;

use crate::error::{ParseError, ServerError};
use super::{Message, RespType, Value};

const TEXT_TYPES: &[RespType] = &[RespType::SimpleString, RespType::BulkString];
const INTEGER_TYPES: &[RespType] = &[RespType::Integer];
const ERROR_TYPES: &[RespType] = &[RespType::Error];
const BULK_TYPES: &[RespType] = &[RespType::BulkString];
const ARRAY_TYPES: &[RespType] = &[RespType::Array];

impl Message {
    /// Text of a simple or bulk string.
    ///
    /// A null bulk string yields `Ok(None)`, an empty one `Ok(Some(""))`.
    /// Bulk payloads that are not UTF-8 are converted lossily; use
    /// [`Message::as_bytes`] for binary data.
    pub fn as_text(&self) -> Result<Option<Cow<'_, str>>, ParseError> {
        match self.value() {
            Value::SimpleString(s) => Ok(Some(Cow::Borrowed(s.as_str()))),
            Value::BulkString(Some(bytes)) => Ok(Some(String::from_utf8_lossy(bytes))),
            Value::BulkString(None) => Ok(None),
            _ => Err(ParseError::new(TEXT_TYPES, self.resp_type())),
        }
    }

    /// Raw payload of a bulk string (`None` for the null bulk string)
    pub fn as_bytes(&self) -> Result<Option<&[u8]>, ParseError> {
        match self.value() {
            Value::BulkString(payload) => Ok(payload.as_deref()),
            _ => Err(ParseError::new(BULK_TYPES, self.resp_type())),
        }
    }

    pub fn as_integer(&self) -> Result<i64, ParseError> {
        match self.value() {
            Value::Integer(n) => Ok(*n),
            _ => Err(ParseError::new(INTEGER_TYPES, self.resp_type())),
        }
    }

    /// The server error carried by an error reply
    pub fn as_error(&self) -> Result<ServerError, ParseError> {
        match self.value() {
            Value::Error(line) => Ok(ServerError::new(line.as_str())),
            _ => Err(ParseError::new(ERROR_TYPES, self.resp_type())),
        }
    }

    /// Elements of an array in wire order (`None` for the null array)
    pub fn as_array(&self) -> Result<Option<&[Message]>, ParseError> {
        match self.value() {
            Value::Array(elements) => Ok(elements.as_deref()),
            _ => Err(ParseError::new(ARRAY_TYPES, self.resp_type())),
        }
    }

    /// True for the null bulk string and the null array
    pub fn is_null(&self) -> bool {
        matches!(self.value(), Value::BulkString(None) | Value::Array(None))
    }
}
