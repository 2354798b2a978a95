//! # rego
//!
//! A streaming decoder for the Redis serialization protocol (RESP) with:
//! - Recursive, depth-bounded decoding of the five RESP2 reply types
//! - Typed accessors that report shape mismatches instead of panicking
//! - A scan loop handing replies to consumers over a FIFO channel
//! - A line-oriented client (REPL) built on top
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   requests    ┌─────────────────────────────┐
//! │     REPL     │──────────────▶│        TCP Connection       │
//! │ (main thread)│               └──────────────┬──────────────┘
//! └──────────────┘                              │ replies
//!                                ┌──────────────▼──────────────┐
//!                                │   Scanner (decode_next loop)│
//!                                │      (scanner thread)       │
//!                                └──────────────┬──────────────┘
//!                                               │ channel (FIFO)
//!                                ┌──────────────▼──────────────┐
//!                                │   Printer / typed accessors │
//!                                └─────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod protocol;
pub mod network;
pub mod repl;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ParseError, RegoError, Result, ServerError};
pub use config::Config;
pub use protocol::{Decoder, Message, RespType, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rego
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
