//! Configuration for rego
//!
//! Centralized configuration with sensible defaults.

use crate::error::{RegoError, Result};

/// Highest accepted `max_depth`; keeps recursive array decoding well inside a
/// default thread stack
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Main configuration for a rego client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Connection read timeout (milliseconds, 0 = block until data arrives)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    /// How long to wait for outstanding replies once input ends
    /// (milliseconds, 0 = until the server closes)
    pub drain_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Decoder Limits
    // -------------------------------------------------------------------------
    /// Maximum array nesting; a top-level array counts as depth 1
    pub max_depth: usize,

    /// Largest accepted bulk string payload (in bytes)
    pub max_bulk_len: usize,

    /// Largest accepted array element count
    pub max_array_len: usize,

    /// Longest accepted simple string / error line (in bytes, without CRLF)
    pub max_inline_len: usize,

    // -------------------------------------------------------------------------
    // Hand-off Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the decoder -> consumer channel (None = unbounded)
    pub channel_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            drain_timeout_ms: 2000,
            max_depth: 64,
            max_bulk_len: 512 * 1024 * 1024, // 512 MB
            max_array_len: i32::MAX as usize,
            max_inline_len: 64 * 1024, // 64 KB
            channel_capacity: Some(1024),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can drive a decoder and a connection
    pub fn validate(&self) -> Result<()> {
        if self.server_addr.trim().is_empty() {
            return Err(RegoError::Config("server address is empty".to_string()));
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(RegoError::Config(format!(
                "max_depth must be between 1 and {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the drain timeout (in milliseconds)
    pub fn drain_timeout_ms(mut self, ms: u64) -> Self {
        self.config.drain_timeout_ms = ms;
        self
    }

    /// Set the maximum array nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set the largest accepted bulk string (in bytes)
    pub fn max_bulk_len(mut self, len: usize) -> Self {
        self.config.max_bulk_len = len;
        self
    }

    /// Set the largest accepted array element count
    pub fn max_array_len(mut self, len: usize) -> Self {
        self.config.max_array_len = len;
        self
    }

    /// Set the longest accepted simple string / error line (in bytes)
    pub fn max_inline_len(mut self, len: usize) -> Self {
        self.config.max_inline_len = len;
        self
    }

    /// Set the hand-off channel capacity (None = unbounded)
    pub fn channel_capacity(mut self, capacity: Option<usize>) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
