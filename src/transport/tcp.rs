//! TCP Transport
//!
//! Control channel over a single TCP stream.

use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};

use bytes::Bytes;

use super::framing::read_frame;
use super::Transport;
use crate::error::{NetSdrError, Result};

/// An open control stream
struct Stream {
    /// Read half (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// Write half (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: SocketAddr,
}

/// Control channel transport over TCP
pub struct TcpTransport {
    stream: Option<Stream>,
    nodelay: bool,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self {
            stream: None,
            nodelay: true,
        }
    }

    /// Enable or disable Nagle's algorithm on future connections
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Address of the connected peer
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().map(|s| s.peer_addr)
    }

    fn open(&self, addr: SocketAddr) -> std::io::Result<Stream> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(self.nodelay)?;

        let read_stream = stream.try_clone()?;
        Ok(Stream {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr: addr,
        })
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: IpAddr, port: u16) -> Result<()> {
        if self.stream.is_some() {
            return Err(NetSdrError::InvalidState(
                "transport is already connected".to_string(),
            ));
        }

        let addr = SocketAddr::new(host, port);
        match self.open(addr) {
            Ok(stream) => {
                tracing::info!("Connection successful on {}", addr);
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => Err(NetSdrError::connection(
                format!("failed to connect to {}: {}", addr, e),
                e,
            )),
        }
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| NetSdrError::disconnected("transport is not connected"))?;

        if let Err(e) = stream.writer.flush() {
            return Err(NetSdrError::connection("failed to flush before disconnect", e));
        }

        match stream.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => {}
            // Peer already closed its side
            Err(e) if e.kind() == ErrorKind::NotConnected => {}
            Err(e) => {
                return Err(NetSdrError::connection(
                    format!("failed to disconnect from {}", stream.peer_addr),
                    e,
                ))
            }
        }

        tracing::info!("Disconnected from {}", stream.peer_addr);
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| NetSdrError::disconnected("stream is not writable"))?;

        stream
            .writer
            .write_all(bytes)
            .and_then(|_| stream.writer.flush())
            .map_err(|e| NetSdrError::connection(format!("failed to send to {}", stream.peer_addr), e))?;

        tracing::trace!("Sent {} bytes to {}", bytes.len(), stream.peer_addr);
        Ok(())
    }

    fn receive(&mut self) -> Result<Bytes> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| NetSdrError::disconnected("transport is not connected"))?;

        read_frame(&mut stream.reader)
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
