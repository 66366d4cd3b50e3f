//! Streaming Pipeline Module
//!
//! Captures the I/Q datagram stream to a file while streaming is enabled.
//!
//! ## Architecture
//! ```text
//!  UDP socket ──► receive stage ──► unbounded queue ──► persist stage ──► file
//!                      ▲                                      ▲
//!                      └──────── shared CancellationToken ────┘
//! ```
//!
//! - Single producer, single consumer, FIFO: datagrams land in arrival order
//! - The queue is unbounded; a slow sink grows memory instead of dropping data
//! - Each stage owns its resource (socket or file) and releases it on exit

mod cancel;
mod stages;

use std::net::{SocketAddr, UdpSocket};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::Bytes;
use crossbeam::channel::unbounded;

use crate::config::Config;
use crate::error::{NetSdrError, Result};

pub use cancel::CancellationToken;
pub use stages::{persist_stage, receive_stage, StageCounters};

/// Settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Local address of the datagram listener
    pub bind_addr: SocketAddr,

    /// Sink file, truncated on start
    pub sink_path: PathBuf,

    pub max_datagram_size: usize,

    /// Socket read timeout between cancellation checks
    pub poll_interval: Duration,
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            bind_addr: config.data_bind_addr,
            sink_path: config.output_path.clone(),
            max_datagram_size: config.max_datagram_size,
            poll_interval: Duration::from_millis(config.receive_poll_interval_ms),
        }
    }
}

/// Totals of a completed pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    pub datagrams_written: u64,
    pub bytes_written: u64,
}

/// Resources of a running pipeline
struct ActivePipeline {
    cancel: CancellationToken,
    local_addr: SocketAddr,
    sink_path: PathBuf,
    receiver: JoinHandle<StageCounters>,
    persister: JoinHandle<StageCounters>,
}

/// Owner of the receive/persist stage pair
///
/// Absent state outside a start/stop window; `stop` is idempotent.
pub struct StreamingPipeline {
    active: Option<ActivePipeline>,
}

impl StreamingPipeline {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Bound address of the datagram listener while running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.active.as_ref().map(|a| a.local_addr)
    }

    /// Bind the listener and launch both stages
    ///
    /// Fails with `InvalidState` if a run is already active, leaving that run
    /// untouched.
    pub fn start(&mut self, options: PipelineOptions) -> Result<SocketAddr> {
        if self.active.is_some() {
            return Err(NetSdrError::InvalidState(
                "UDP receiver is already running".to_string(),
            ));
        }

        let socket = UdpSocket::bind(options.bind_addr)?;
        // A zero timeout is rejected by the OS
        socket.set_read_timeout(Some(options.poll_interval.max(Duration::from_millis(1))))?;
        let local_addr = socket.local_addr()?;

        let cancel = CancellationToken::new();
        let (tx, rx) = unbounded::<Bytes>();

        let receiver = {
            let cancel = cancel.clone();
            let max_datagram_size = options.max_datagram_size;
            thread::Builder::new()
                .name("netsdr-udp-rx".to_string())
                .spawn(move || receive_stage(socket, tx, cancel, max_datagram_size))?
        };

        let persister = {
            let cancel = cancel.clone();
            let sink_path = options.sink_path.clone();
            thread::Builder::new()
                .name("netsdr-sink".to_string())
                .spawn(move || persist_stage(&sink_path, rx, cancel))
        };
        let persister = match persister {
            Ok(handle) => handle,
            Err(e) => {
                cancel.cancel();
                let _ = receiver.join();
                return Err(e.into());
            }
        };

        tracing::info!(
            "Streaming started: listening on {}, writing to {}",
            local_addr,
            options.sink_path.display()
        );

        self.active = Some(ActivePipeline {
            cancel,
            local_addr,
            sink_path: options.sink_path,
            receiver,
            persister,
        });
        Ok(local_addr)
    }

    /// Cancel both stages and wait for the queue to drain
    ///
    /// Returns `None` when nothing was running.
    pub fn stop(&mut self) -> Option<PipelineStats> {
        let active = self.active.take()?;
        active.cancel.cancel();

        let received = active.receiver.join().unwrap_or_else(|_| {
            tracing::error!("UDP receiver thread panicked");
            StageCounters::default()
        });
        let written = active.persister.join().unwrap_or_else(|_| {
            tracing::error!("Sink writer thread panicked");
            StageCounters::default()
        });

        let stats = PipelineStats {
            datagrams_received: received.datagrams,
            bytes_received: received.bytes,
            datagrams_written: written.datagrams,
            bytes_written: written.bytes,
        };

        tracing::info!(
            "Streaming stopped: {} datagrams received, {} bytes written to {}",
            stats.datagrams_received,
            stats.bytes_written,
            active.sink_path.display()
        );
        Some(stats)
    }
}

impl Default for StreamingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StreamingPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}
