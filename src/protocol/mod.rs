//! Protocol Module
//!
//! The RESP wire protocol spoken by Redis servers.
//!
//! ## Reply Format
//! ```text
//! ┌─────────┬──────────────────────────────────────────────┐
//! │ Tag (1) │ Body                                         │
//! └─────────┴──────────────────────────────────────────────┘
//! ```
//!
//! ### Reply Types
//! - `+`: Simple string - `+OK\r\n`
//! - `-`: Error         - `-ERR unknown command\r\n`
//! - `:`: Integer       - `:1000\r\n`
//! - `$`: Bulk string   - `$5\r\nhello\r\n` (`$-1\r\n` is null)
//! - `*`: Array         - `*2\r\n:1\r\n+ok\r\n` (`*-1\r\n` is null)
//!
//! ### Request Format
//! Requests are arrays of bulk strings, see [`encode_command`].

mod message;
mod accessor;
mod decoder;
mod encoder;

pub use message::{Message, RespType, Value};
pub use decoder::{Decoder, RAW_PREVIEW_LEN};
pub use encoder::{encode_command, write_command};
