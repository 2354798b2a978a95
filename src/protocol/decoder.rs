//! Streaming reply decoder
//!
//! Reads exactly one reply per call from a buffered byte source, consuming
//! the bytes that belong to it and nothing more.
//!
//! ## Read Primitives
//! - `read_byte`: one byte (the type tag, integer digits, terminators)
//! - `read_line`: a CRLF-terminated line (simple strings, errors)
//! - `read_integer`: ASCII decimal digits accumulated up to CRLF
//!   (integers, bulk lengths, array lengths)
//! - `read_bulk`: exactly `len` raw bytes plus the trailing CRLF
//!
//! Arrays recurse into the decoder once per declared element, bounded by
//! [`Config::max_depth`].
//!
//! ## Raw Text
//! Scalars keep the exact line they were read from. Bulk strings keep their
//! header plus at most [`RAW_PREVIEW_LEN`] payload bytes, arrays only their
//! header, so retained raw text stays linear in the input.

use std::io::{BufRead, Read};

use bytes::Bytes;

use crate::config::Config;
use crate::error::{RegoError, Result};
use super::{Message, RespType, Value};

/// Bulk payloads are read in steps of this size so a lying length field on a
/// short stream cannot force one huge allocation.
const READ_CHUNK: usize = 64 * 1024;

/// Upper bound on array capacity reserved up front
const MAX_PREALLOC_ELEMENTS: usize = 1024;

/// Payload bytes of a bulk string kept in its raw text
pub const RAW_PREVIEW_LEN: usize = 64;

/// Header buffer capacity kept between decodes
const RETAINED_HEADER_CAPACITY: usize = 4 * 1024;

/// Decodes replies from a buffered byte source
pub struct Decoder<R> {
    /// Byte source (exclusively owned for the lifetime of the decoder)
    reader: R,

    /// Maximum array nesting
    max_depth: usize,

    /// Largest accepted bulk payload
    max_bulk_len: usize,

    /// Largest accepted array element count
    max_array_len: usize,

    /// Longest accepted simple string / error line
    max_inline_len: usize,

    /// Tag and header bytes of the reply being decoded
    header: Vec<u8>,
}

impl<R: BufRead> Decoder<R> {
    /// Create a decoder with the default limits
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &Config::default())
    }

    /// Create a decoder using the limits from `config`
    pub fn with_config(reader: R, config: &Config) -> Self {
        Self {
            reader,
            max_depth: config.max_depth,
            max_bulk_len: config.max_bulk_len,
            max_array_len: config.max_array_len,
            max_inline_len: config.max_inline_len,
            header: Vec::new(),
        }
    }

    /// Decode the next reply, blocking until it is complete.
    ///
    /// Returns [`RegoError::Closed`] or [`RegoError::TimedOut`] when the
    /// source ends or stalls before the first byte of a reply. Any other error
    /// leaves the stream at an unknown position and it should be abandoned.
    pub fn decode_next(&mut self) -> Result<Message> {
        self.header.clear();

        let tag = match self.read_byte() {
            Ok(tag) => tag,
            Err(RegoError::Truncated) => return Err(RegoError::Closed),
            Err(e) => return Err(e),
        };

        let decoded = match self.decode_tagged(tag, 0) {
            Err(RegoError::TimedOut) => Err(RegoError::Stalled),
            other => other,
        };

        if self.header.capacity() > RETAINED_HEADER_CAPACITY {
            self.header = Vec::new();
        }
        decoded
    }

    /// Borrow the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consume the decoder, returning the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn decode_element(&mut self, depth: usize) -> Result<Message> {
        let tag = self.read_byte()?;
        self.decode_tagged(tag, depth)
    }

    /// Decode the body of a reply whose tag byte was just read.
    ///
    /// `depth` is the number of arrays enclosing this reply.
    fn decode_tagged(&mut self, tag: u8, depth: usize) -> Result<Message> {
        let resp_type = RespType::from_tag(tag).ok_or(RegoError::UnknownTypeTag(tag))?;

        match resp_type {
            RespType::SimpleString => {
                let line = self.read_line()?;
                Ok(Message::new(self.take_header(), Value::SimpleString(line)))
            }
            RespType::Error => {
                let line = self.read_line()?;
                Ok(Message::new(self.take_header(), Value::Error(line)))
            }
            RespType::Integer => {
                let n = self.read_integer()?;
                Ok(Message::new(self.take_header(), Value::Integer(n)))
            }
            RespType::BulkString => self.read_bulk(),
            RespType::Array => self.read_array(depth),
        }
    }

    /// Render and reset the header collected for the current reply
    fn take_header(&mut self) -> String {
        let raw = String::from_utf8_lossy(&self.header).into_owned();
        self.header.clear();
        raw
    }

    // =========================================================================
    // Per-type Readers
    // =========================================================================

    fn read_bulk(&mut self) -> Result<Message> {
        let len = match self.read_length(self.max_bulk_len)? {
            Some(len) => len,
            None => return Ok(Message::new(self.take_header(), Value::BulkString(None))),
        };
        let mut raw = self.take_header();

        let mut payload = Vec::with_capacity(len.min(READ_CHUNK));
        while payload.len() < len {
            let step = (len - payload.len()).min(READ_CHUNK) as u64;
            let read = (&mut self.reader)
                .take(step)
                .read_to_end(&mut payload)
                .map_err(RegoError::from_read)?;
            if read == 0 {
                return Err(RegoError::Truncated);
            }
        }
        self.expect_crlf()?;

        if payload.len() <= RAW_PREVIEW_LEN {
            raw.push_str(&String::from_utf8_lossy(&payload));
            raw.push_str("\r\n");
        } else {
            raw.push_str(&String::from_utf8_lossy(&payload[..RAW_PREVIEW_LEN]));
            raw.push_str("...");
        }
        Ok(Message::new(raw, Value::BulkString(Some(Bytes::from(payload)))))
    }

    fn read_array(&mut self, depth: usize) -> Result<Message> {
        if depth >= self.max_depth {
            return Err(RegoError::NestingTooDeep {
                max: self.max_depth,
            });
        }

        let len = self.read_length(self.max_array_len)?;
        let raw = self.take_header();
        let len = match len {
            Some(len) => len,
            None => return Ok(Message::new(raw, Value::Array(None))),
        };

        let mut elements = Vec::with_capacity(len.min(MAX_PREALLOC_ELEMENTS));
        for _ in 0..len {
            elements.push(self.decode_element(depth + 1)?);
        }
        Ok(Message::new(raw, Value::Array(Some(elements))))
    }

    /// Read a length header; negative lengths denote null.
    fn read_length(&mut self, max: usize) -> Result<Option<usize>> {
        let len = self.read_integer()?;
        if len < 0 {
            return Ok(None);
        }
        match usize::try_from(len) {
            Ok(n) if n <= max => Ok(Some(n)),
            _ => Err(RegoError::LengthTooLarge { len, max }),
        }
    }

    // =========================================================================
    // Read Primitives
    // =========================================================================

    /// Accumulate ASCII digits up to CRLF, with an optional leading `-`
    fn read_integer(&mut self) -> Result<i64> {
        let mut byte = self.read_byte()?;
        let negative = byte == b'-';
        if negative {
            byte = self.read_byte()?;
        }

        let mut value: i64 = 0;
        let mut digits = 0usize;
        while byte != b'\r' {
            if !byte.is_ascii_digit() {
                return Err(RegoError::InvalidInteger(format!(
                    "unexpected byte 0x{:02x}",
                    byte
                )));
            }
            let digit = i64::from(byte - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| {
                    if negative {
                        v.checked_sub(digit)
                    } else {
                        v.checked_add(digit)
                    }
                })
                .ok_or_else(|| RegoError::InvalidInteger("value overflows i64".to_string()))?;
            digits += 1;
            byte = self.read_byte()?;
        }

        if digits == 0 {
            return Err(RegoError::InvalidInteger("no digits".to_string()));
        }

        // CR already consumed
        if self.read_byte()? != b'\n' {
            return Err(RegoError::MissingTerminator);
        }
        Ok(value)
    }

    /// Read the rest of a line, excluding the CRLF terminator
    fn read_line(&mut self) -> Result<String> {
        let limit = (self.max_inline_len as u64).saturating_add(2);
        let mut line = Vec::new();
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut line)
            .map_err(RegoError::from_read)?;
        self.header.extend_from_slice(&line);

        if let Some(body) = line.strip_suffix(b"\r\n") {
            return Ok(String::from_utf8_lossy(body).into_owned());
        }
        if line.last() == Some(&b'\n') {
            Err(RegoError::MissingTerminator)
        } else if read as u64 == limit {
            Err(RegoError::LineTooLong {
                max: self.max_inline_len,
            })
        } else {
            Err(RegoError::Truncated)
        }
    }

    fn expect_crlf(&mut self) -> Result<()> {
        let mut terminator = [0u8; 2];
        self.reader
            .read_exact(&mut terminator)
            .map_err(RegoError::from_read)?;

        if &terminator != b"\r\n" {
            return Err(RegoError::MissingTerminator);
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.reader
            .read_exact(&mut byte)
            .map_err(RegoError::from_read)?;
        self.header.push(byte[0]);
        Ok(byte[0])
    }
}
