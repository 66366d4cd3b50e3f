//! Client Module
//!
//! The protocol engine: owns the control connection, issues commands and
//! drives the streaming pipeline.
//!
//! ## Responsibilities
//! - Connection lifecycle over a `Transport`
//! - Build receiver state and frequency commands
//! - Send one command, read one response, classify it
//! - Start the pipeline after an acknowledged StartIQ, stop it after StopIQ

use std::net::{IpAddr, SocketAddr};

use crate::config::Config;
use crate::error::{NetSdrError, Result};
use crate::pipeline::{PipelineOptions, PipelineStats, StreamingPipeline};
use crate::protocol::{
    classify_response, frequency_parameters, receiver_state_parameters, ControlCode,
    ControlItemMessage, Message, ReceiverStateParams, Reply, ALL_CHANNELS,
};
use crate::transport::Transport;

/// NetSDR control client
///
/// ## Ordering
///
/// Commands are strictly sequential: each call sends one request and blocks
/// until its response is classified. The protocol carries no request ids, so
/// responses are matched to requests by program order alone (`&mut self`
/// enforces one outstanding request).
///
/// ## Teardown
///
/// `disconnect` leaves an active pipeline running. Dropping the client stops
/// the pipeline and closes the connection.
pub struct NetSdrClient<T: Transport> {
    /// Control channel
    transport: T,

    config: Config,

    /// Active only between an acknowledged StartIQ and StopIQ
    pipeline: StreamingPipeline,

    /// Totals of the last completed streaming run
    last_stats: Option<PipelineStats>,
}

impl<T: Transport> NetSdrClient<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            pipeline: StreamingPipeline::new(),
            last_stats: None,
        }
    }

    /// Client with the default configuration
    pub fn with_transport(transport: T) -> Self {
        Self::new(transport, Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -------------------------------------------------------------------------
    // Connection Lifecycle
    // -------------------------------------------------------------------------

    /// Connect to `ip:port`
    ///
    /// The address is parsed before any connection attempt.
    pub fn connect(&mut self, ip: &str, port: u16) -> Result<()> {
        let host: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| NetSdrError::InvalidArgument(format!("invalid IP address: {:?}", ip)))?;

        if self.transport.is_connected() {
            return Err(NetSdrError::InvalidState("client is already connected".to_string()));
        }

        self.transport.connect(host, port)
    }

    /// Connect to `ip` on the configured control port
    pub fn connect_default(&mut self, ip: &str) -> Result<()> {
        let port = self.config.control_port;
        self.connect(ip, port)
    }

    /// Close the control connection; a no-op when not connected
    pub fn disconnect(&mut self) -> Result<()> {
        if !self.transport.is_connected() {
            return Ok(());
        }

        if self.pipeline.is_running() {
            tracing::warn!("Disconnecting while streaming; the UDP receiver keeps running");
        }

        self.transport.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Start or stop I/Q streaming
    ///
    /// Only `StartIq` and `StopIq` are accepted. StopIQ ignores `params`.
    pub fn set_receiver_state(
        &mut self,
        code: ControlCode,
        params: ReceiverStateParams,
    ) -> Result<Reply> {
        self.ensure_connected()?;

        let parameters = receiver_state_parameters(code, params)?;

        if code == ControlCode::StartIq && self.pipeline.is_running() {
            return Err(NetSdrError::InvalidState(
                "UDP receiver is already running".to_string(),
            ));
        }

        let reply = self.execute(ControlItemMessage::new(code, parameters.to_vec())?)?;

        match code {
            ControlCode::StartIq => {
                self.pipeline.start(PipelineOptions::from(&self.config))?;
            }
            ControlCode::StopIq => {
                if let Some(stats) = self.pipeline.stop() {
                    self.last_stats = Some(stats);
                }
            }
            _ => {}
        }

        Ok(reply)
    }

    /// StartIQ with the default channel, capture mode and FIFO count
    pub fn start_iq(&mut self) -> Result<Reply> {
        self.set_receiver_state(ControlCode::StartIq, ReceiverStateParams::default())
    }

    pub fn stop_iq(&mut self) -> Result<Reply> {
        self.set_receiver_state(ControlCode::StopIq, ReceiverStateParams::default())
    }

    /// Tune `channel_id` to `frequency_hz`
    ///
    /// The frequency travels as 5 bytes; bits above 40 are dropped.
    pub fn set_target_frequency(&mut self, frequency_hz: u64, channel_id: u8) -> Result<Reply> {
        self.ensure_connected()?;

        let parameters = frequency_parameters(frequency_hz, channel_id);
        tracing::debug!("Setting channel 0x{:02x} to {} Hz", channel_id, frequency_hz);

        self.execute(ControlItemMessage::new(
            ControlCode::SetFrequency,
            parameters.to_vec(),
        )?)
    }

    /// Tune all channels to `frequency_hz`
    pub fn set_frequency(&mut self, frequency_hz: u64) -> Result<Reply> {
        self.set_target_frequency(frequency_hz, ALL_CHANNELS)
    }

    // -------------------------------------------------------------------------
    // Streaming State
    // -------------------------------------------------------------------------

    pub fn is_streaming(&self) -> bool {
        self.pipeline.is_running()
    }

    /// Bound address of the datagram listener while streaming
    pub fn data_addr(&self) -> Option<SocketAddr> {
        self.pipeline.local_addr()
    }

    pub fn last_stats(&self) -> Option<PipelineStats> {
        self.last_stats
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_connected(&self) -> Result<()> {
        if !self.transport.is_connected() {
            return Err(NetSdrError::InvalidState("client is not connected".to_string()));
        }
        Ok(())
    }

    /// Send one command and classify its single response
    fn execute(&mut self, command: ControlItemMessage) -> Result<Reply> {
        let code = command.code();
        let bytes = Message::from(command).to_bytes();

        tracing::trace!("Sending {:?} ({} bytes)", code, bytes.len());
        self.transport.send(&bytes)?;

        let response = self.transport.receive()?;
        classify_response(&response)
    }
}

impl<T: Transport> Drop for NetSdrClient<T> {
    fn drop(&mut self) {
        if let Some(stats) = self.pipeline.stop() {
            self.last_stats = Some(stats);
        }

        if self.transport.is_connected() {
            if let Err(e) = self.transport.disconnect() {
                tracing::warn!("Error disconnecting during teardown: {}", e);
            }
        }
    }
}
