//! Scan Loop
//!
//! Runs the decoder in a cycle and publishes every reply to a channel.
//!
//! ## Threading
//! - One scanner thread owns the byte source and is the only sender
//! - Consumers pull from the [`Receiver`] in decode order
//! - A [`CancelToken`] stops the loop between replies; pair it with a
//!   [`CancelHandle`](super::CancelHandle) to also unblock a pending read

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{RegoError, Result};
use crate::protocol::{Decoder, Message};

/// How a scan loop ended without the stream being corrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The source reached end of input between replies
    Closed,

    /// The loop was cancelled through its token
    Cancelled,

    /// The source's read timeout expired before the next reply started
    TimedOut,

    /// Every receiver was dropped
    ConsumerGone,
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Decodes replies and sends them to consumers in order
pub struct Scanner<R> {
    decoder: Decoder<R>,
    sender: Sender<Message>,
    token: CancelToken,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(decoder: Decoder<R>, sender: Sender<Message>, token: CancelToken) -> Self {
        Self {
            decoder,
            sender,
            token,
        }
    }

    /// Scan until the stream ends, the token is cancelled or consumers leave.
    ///
    /// Returns `Err` only when the stream is corrupted or unreadable.
    pub fn run(&mut self) -> Result<ScanOutcome> {
        let mut published = 0usize;

        loop {
            if self.token.is_cancelled() {
                tracing::debug!("Scan cancelled after {} replies", published);
                return Ok(ScanOutcome::Cancelled);
            }

            let message = match self.decoder.decode_next() {
                Ok(message) => message,
                // A cancelled read surfaces as whatever the source reported
                Err(_) if self.token.is_cancelled() => {
                    tracing::debug!("Scan cancelled after {} replies", published);
                    return Ok(ScanOutcome::Cancelled);
                }
                Err(RegoError::Closed) => {
                    tracing::debug!("Stream closed after {} replies", published);
                    return Ok(ScanOutcome::Closed);
                }
                Err(RegoError::TimedOut) => {
                    tracing::debug!("Read timed out after {} replies", published);
                    return Ok(ScanOutcome::TimedOut);
                }
                Err(e) => {
                    tracing::warn!("Stream corrupted after {} replies: {}", published, e);
                    return Err(e);
                }
            };

            tracing::trace!("Decoded {} reply: {:?}", message.resp_type(), message.raw());

            if self.sender.send(message).is_err() {
                tracing::debug!("All consumers gone after {} replies", published);
                return Ok(ScanOutcome::ConsumerGone);
            }
            published += 1;
        }
    }

    pub fn into_decoder(self) -> Decoder<R> {
        self.decoder
    }
}

/// Build the hand-off channel (`None` = unbounded)
pub fn hand_off(capacity: Option<usize>) -> (Sender<Message>, Receiver<Message>) {
    match capacity {
        Some(cap) => channel::bounded(cap),
        None => channel::unbounded(),
    }
}

/// Run a scan loop on its own thread
pub fn spawn_scanner<R>(
    decoder: Decoder<R>,
    capacity: Option<usize>,
    token: CancelToken,
) -> Result<(Receiver<Message>, JoinHandle<Result<ScanOutcome>>)>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = hand_off(capacity);
    let mut scanner = Scanner::new(decoder, sender, token);

    let handle = thread::Builder::new()
        .name("rego-scanner".to_string())
        .spawn(move || scanner.run())?;

    Ok((receiver, handle))
}
