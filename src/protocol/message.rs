//! Message definitions
//!
//! Represents decoded replies.

use std::fmt;

use bytes::Bytes;

/// Reply types, identified on the wire by their leading byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RespType {
    SimpleString = b'+',
    Error = b'-',
    Integer = b':',
    BulkString = b'$',
    Array = b'*',
}

impl RespType {
    /// Look up the type for a leading tag byte
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'+' => Some(RespType::SimpleString),
            b'-' => Some(RespType::Error),
            b':' => Some(RespType::Integer),
            b'$' => Some(RespType::BulkString),
            b'*' => Some(RespType::Array),
            _ => None,
        }
    }

    /// The tag byte that introduces this type on the wire
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for RespType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RespType::SimpleString => "SimpleString",
            RespType::Error => "Error",
            RespType::Integer => "Integer",
            RespType::BulkString => "BulkString",
            RespType::Array => "Array",
        };
        f.write_str(name)
    }
}

/// Decoded payload of a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// One-line status reply (`+OK`)
    SimpleString(String),

    /// One-line error reply (`-ERR ...`)
    Error(String),

    /// Signed 64-bit integer (`:42`)
    Integer(i64),

    /// Binary-safe payload; `None` for the null bulk string (`$-1`)
    BulkString(Option<Bytes>),

    /// Nested replies in wire order; `None` for the null array (`*-1`)
    Array(Option<Vec<Message>>),
}

impl Value {
    /// The wire type this payload was decoded from
    pub fn resp_type(&self) -> RespType {
        match self {
            Value::SimpleString(_) => RespType::SimpleString,
            Value::Error(_) => RespType::Error,
            Value::Integer(_) => RespType::Integer,
            Value::BulkString(_) => RespType::BulkString,
            Value::Array(_) => RespType::Array,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::SimpleString(s) | Value::Error(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::BulkString(Some(bytes)) => f.write_str(&String::from_utf8_lossy(bytes)),
            Value::BulkString(None) | Value::Array(None) => f.write_str("(nil)"),
            Value::Array(Some(elements)) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A decoded reply: its payload plus the protocol text it was read from.
///
/// The type tag is derived from the payload, so it can never disagree with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    raw: String,
    value: Value,
}

impl Message {
    pub fn new(raw: impl Into<String>, value: Value) -> Self {
        Self {
            raw: raw.into(),
            value,
        }
    }

    /// The reply type
    pub fn resp_type(&self) -> RespType {
        self.value.resp_type()
    }

    /// The protocol text consumed to produce this message
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The decoded payload
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
