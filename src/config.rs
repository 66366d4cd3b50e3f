//! Configuration for the NetSDR client
//!
//! Centralized configuration with sensible defaults.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default TCP port of the control channel
pub const DEFAULT_CONTROL_PORT: u16 = 50000;

/// Fixed local UDP port the receiver streams I/Q data to
pub const DEFAULT_DATA_PORT: u16 = 60000;

/// Main configuration for a client instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Control Channel
    // -------------------------------------------------------------------------
    /// TCP port used when connecting without an explicit port
    pub control_port: u16,

    /// Disable Nagle's algorithm on the control stream
    pub tcp_nodelay: bool,

    // -------------------------------------------------------------------------
    // Data Channel
    // -------------------------------------------------------------------------
    /// Local address the datagram listener binds to while streaming
    pub data_bind_addr: SocketAddr,

    /// Receive buffer size for a single datagram
    pub max_datagram_size: usize,

    /// Socket read timeout (milliseconds) between cancellation checks
    pub receive_poll_interval_ms: u64,

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------
    /// Sink file, truncated every time streaming starts
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_port: DEFAULT_CONTROL_PORT,
            tcp_nodelay: true,
            data_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_DATA_PORT)),
            max_datagram_size: 65_535,
            receive_poll_interval_ms: 100,
            output_path: PathBuf::from("udp_data.bin"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the default control port
    pub fn control_port(mut self, port: u16) -> Self {
        self.config.control_port = port;
        self
    }

    /// Enable or disable TCP_NODELAY on the control stream
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.config.tcp_nodelay = enabled;
        self
    }

    /// Set the local datagram listener address
    pub fn data_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.data_bind_addr = addr;
        self
    }

    /// Set the per-datagram receive buffer size
    pub fn max_datagram_size(mut self, size: usize) -> Self {
        self.config.max_datagram_size = size;
        self
    }

    /// Set the receive poll interval (in milliseconds)
    pub fn receive_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.receive_poll_interval_ms = ms;
        self
    }

    /// Set the sink file path
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
