//! Error types for the NetSDR client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using NetSdrError
pub type Result<T> = std::result::Result<T, NetSdrError>;

/// Unified error type for NetSDR operations
#[derive(Debug, Error)]
pub enum NetSdrError {
    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Unexpected end of stream: expected {expected} bytes, received {received}")]
    EndOfStream { expected: usize, received: usize },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Received NAK with error code: {code}")]
    Nak { code: u8 },

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Local I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetSdrError {
    /// Connection error wrapping an underlying I/O failure
    pub fn connection(message: impl Into<String>, source: std::io::Error) -> Self {
        NetSdrError::Connection {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Connection error without an underlying cause
    pub fn disconnected(message: impl Into<String>) -> Self {
        NetSdrError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// True for failures callers should treat as a lost or unusable connection
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            NetSdrError::Connection { .. } | NetSdrError::EndOfStream { .. }
        )
    }
}
