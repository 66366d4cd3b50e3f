//! Transport Module
//!
//! Reliable byte-stream transport for the control channel.
//!
//! ## Architecture
//! - `Transport` trait consumed by the client
//! - `TcpTransport` over `std::net::TcpStream`
//! - Header-driven framing: every receive returns exactly one frame

mod framing;
mod tcp;

use std::net::IpAddr;

use bytes::Bytes;

use crate::error::Result;

pub use framing::{read_exact_bytes, read_frame};
pub use tcp::TcpTransport;

/// A byte stream that sends raw bytes and receives whole frames
pub trait Transport: Send {
    /// Establish the stream
    fn connect(&mut self, host: IpAddr, port: u16) -> Result<()>;

    /// Close the stream; the transport is disconnected afterwards even on error
    fn disconnect(&mut self) -> Result<()>;

    /// Write the full buffer
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly one frame (header + payload)
    fn receive(&mut self) -> Result<Bytes>;

    fn is_connected(&self) -> bool;
}
