//! Network Module
//!
//! TCP connection and reply scan loop.
//!
//! ## Architecture
//! - One scanner thread owns the socket's read half and decodes replies
//! - Replies are handed to consumers over a FIFO channel
//! - Requests are written on the socket's write half by the caller

mod connection;
mod scanner;

pub use connection::{CancelHandle, Connection};
pub use scanner::{hand_off, spawn_scanner, CancelToken, ScanOutcome, Scanner};
