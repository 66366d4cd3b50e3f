//! # NetSDR
//!
//! A client for the NetSDR receiver control protocol with:
//! - Bit-exact framing of the 2-byte header plus payload
//! - Sequential command/response engine with ACK/NAK classification
//! - UDP I/Q capture pipeline persisting datagrams to a file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     NetSdrClient                             │
//! │           (connect / receiver state / frequency)             │
//! └───────────┬─────────────────────────────────┬───────────────┘
//!             │ request/response                │ StartIQ / StopIQ
//!             ▼                                 ▼
//!   ┌───────────────────┐            ┌────────────────────────┐
//!   │     Transport     │            │   StreamingPipeline    │
//!   │   (TCP, framed)   │            │ UDP ─► queue ─► file   │
//!   └─────────┬─────────┘            └────────────────────────┘
//!             │
//!             ▼
//!   ┌───────────────────┐
//!   │     Protocol      │
//!   │ (header/messages) │
//!   └───────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod pipeline;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NetSdrError, Result};
pub use config::Config;
pub use client::NetSdrClient;
pub use transport::{TcpTransport, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
