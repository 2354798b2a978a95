//! Error types for rego
//!
//! Two independent classes live here:
//! - [`RegoError`]: everything that can go wrong while reading a stream
//!   (I/O, truncation, malformed frames, limits) plus configuration failures.
//! - [`ParseError`]: a decoded reply did not have the shape a typed accessor
//!   asked for. Always recoverable.

use std::io;

use thiserror::Error;

use crate::protocol::RespType;

/// Result type alias using RegoError
pub type Result<T> = std::result::Result<T, RegoError>;

/// Unified error type for rego operations
#[derive(Debug, Error)]
pub enum RegoError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Stream Lifecycle
    // -------------------------------------------------------------------------
    #[error("Stream closed")]
    Closed,

    #[error("Read timed out")]
    TimedOut,

    // -------------------------------------------------------------------------
    // Decode Errors (stream corrupted / unreadable)
    // -------------------------------------------------------------------------
    #[error("Stream truncated in the middle of a message")]
    Truncated,

    #[error("Read timed out in the middle of a message")]
    Stalled,

    #[error("Unknown type tag: 0x{0:02x}")]
    UnknownTypeTag(u8),

    #[error("Invalid integer field: {0}")]
    InvalidInteger(String),

    #[error("Missing CRLF line terminator")]
    MissingTerminator,

    #[error("Line exceeds {max} bytes")]
    LineTooLong { max: usize },

    #[error("Declared length {len} exceeds limit of {max}")]
    LengthTooLarge { len: i64, max: usize },

    #[error("Array nesting exceeds maximum depth of {max}")]
    NestingTooDeep { max: usize },

    // -------------------------------------------------------------------------
    // Shape Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RegoError {
    /// Map an error raised by the byte source during a read.
    ///
    /// End of input becomes [`RegoError::Truncated`] and an expired timeout
    /// [`RegoError::TimedOut`]. The decoder keeps them as [`RegoError::Closed`]
    /// and `TimedOut` only when no byte of the next message was read yet;
    /// a timeout after that point becomes [`RegoError::Stalled`].
    pub(crate) fn from_read(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => RegoError::Truncated,
            // Unix reports an expired SO_RCVTIMEO as WouldBlock, Windows as TimedOut
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => RegoError::TimedOut,
            _ => RegoError::Io(err),
        }
    }

    /// True for errors that mean the byte stream can no longer be trusted.
    pub fn is_stream_corruption(&self) -> bool {
        matches!(
            self,
            RegoError::Io(_)
                | RegoError::Truncated
                | RegoError::Stalled
                | RegoError::UnknownTypeTag(_)
                | RegoError::InvalidInteger(_)
                | RegoError::MissingTerminator
                | RegoError::LineTooLong { .. }
                | RegoError::LengthTooLarge { .. }
                | RegoError::NestingTooDeep { .. }
        )
    }
}

// =============================================================================
// Typed Accessor Errors
// =============================================================================

/// Marker carried as the source of every [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ParseError")]
pub struct ShapeMismatch;

/// A typed accessor was called on a reply of a different type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("got {got} but expected {}", join_types(.expected))]
pub struct ParseError {
    expected: &'static [RespType],
    got: RespType,
    #[source]
    cause: ShapeMismatch,
}

impl ParseError {
    pub fn new(expected: &'static [RespType], got: RespType) -> Self {
        Self {
            expected,
            got,
            cause: ShapeMismatch,
        }
    }

    /// The types the accessor would have accepted
    pub fn expected(&self) -> &'static [RespType] {
        self.expected
    }

    /// The type the reply actually had
    pub fn got(&self) -> RespType {
        self.got
    }

    pub fn cause(&self) -> ShapeMismatch {
        self.cause
    }
}

fn join_types(types: &[RespType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

// =============================================================================
// Server Errors
// =============================================================================

/// An error reply (`-ERR ...`) sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}")]
pub struct ServerError {
    line: String,
}

impl ServerError {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Leading error code, e.g. `ERR` or `WRONGTYPE`
    pub fn kind(&self) -> &str {
        self.line.split_whitespace().next().unwrap_or("")
    }

    /// Text after the error code
    pub fn message(&self) -> &str {
        match self.line.trim_start().split_once(char::is_whitespace) {
            Some((_, rest)) => rest.trim_start(),
            None => "",
        }
    }

    /// The full error line as received
    pub fn line(&self) -> &str {
        &self.line
    }
}
