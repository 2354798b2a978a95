//! Connection Handler
//!
//! Opens the TCP connection to the server and splits it into a reply decoder,
//! a request writer and a cancel handle.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{RegoError, Result};
use crate::protocol::Decoder;
use super::{CancelToken, ScanOutcome};

/// Interval between checks on a draining scanner
const DRAIN_POLL: Duration = Duration::from_millis(10);

/// A client connection to a server
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Handle used to unblock the reader from another thread
    cancel: CancelHandle,

    /// Decoder limits
    config: Config,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `config.server_addr`
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        let stream = if config.connect_timeout_ms > 0 {
            let timeout = Duration::from_millis(config.connect_timeout_ms);
            connect_with_timeout(&config.server_addr, timeout)?
        } else {
            TcpStream::connect(&config.server_addr)?
        };

        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let cancel_stream = stream.try_clone()?;
        let write_stream = stream;

        let mut connection = Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            cancel: CancelHandle {
                stream: Arc::new(cancel_stream),
                token: CancelToken::new(),
            },
            config: config.clone(),
            peer_addr,
        };
        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;

        tracing::debug!("Connected to {}", connection.peer_addr);
        Ok(connection)
    }

    /// Configure connection timeouts (0 leaves a direction blocking)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle for cancelling reads on this connection
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Split into the reply decoder, the request writer and the cancel handle
    pub fn into_parts(self) -> (Decoder<BufReader<TcpStream>>, BufWriter<TcpStream>, CancelHandle) {
        let decoder = Decoder::with_config(self.reader, &self.config);
        (decoder, self.writer, self.cancel)
    }
}

fn connect_with_timeout(addr: &str, timeout: Duration) -> Result<TcpStream> {
    let mut last_err = None;
    for socket_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(match last_err {
        Some(e) => RegoError::Io(e),
        None => RegoError::Config(format!("address resolved to nothing: {}", addr)),
    })
}

/// Cancels a blocked read on a connection.
///
/// Sets the shared [`CancelToken`] and shuts down the socket's read half, so
/// the pending read returns and the scan loop reports
/// [`ScanOutcome::Cancelled`](super::ScanOutcome::Cancelled).
#[derive(Clone)]
pub struct CancelHandle {
    stream: Arc<TcpStream>,
    token: CancelToken,
}

impl CancelHandle {
    pub fn cancel(&self) -> Result<()> {
        self.token.cancel();
        match self.stream.shutdown(Shutdown::Read) {
            Ok(()) => Ok(()),
            // Peer already went away
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Shut down the write half so the server sees the end of the requests
    pub fn close_requests(&self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Write) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Finish a session whose input has ended.
    ///
    /// Closes the request direction, then lets `scanner` keep delivering
    /// replies until the server closes the connection. If that takes longer
    /// than `grace` the scan is cancelled. `None` waits for the server.
    pub fn drain(
        &self,
        scanner: JoinHandle<Result<ScanOutcome>>,
        grace: Option<Duration>,
    ) -> thread::Result<Result<ScanOutcome>> {
        let mut cancel_now = false;
        if let Err(e) = self.close_requests() {
            tracing::warn!("Failed to close request stream: {}", e);
            cancel_now = true;
        }

        if let Some(grace) = grace {
            let deadline = Instant::now() + grace;
            while !cancel_now && !scanner.is_finished() {
                if Instant::now() >= deadline {
                    tracing::debug!("Drain timed out after {:?}", grace);
                    cancel_now = true;
                    break;
                }
                thread::sleep(DRAIN_POLL);
            }
        }

        if cancel_now && !scanner.is_finished() {
            if let Err(e) = self.cancel() {
                tracing::warn!("Failed to cancel scanner: {}", e);
            }
        }
        scanner.join()
    }

    /// The token to hand to the scan loop
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
