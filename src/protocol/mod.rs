//! Protocol Module
//!
//! Defines the NetSDR control channel wire format.
//!
//! ## Frame Format
//! ```text
//! ┌──────────────────┬─────────────────────────────┐
//! │ Header (2, LE)   │         Payload             │
//! └──────────────────┴─────────────────────────────┘
//! ```
//!
//! The header packs the total frame length (13 bits, header included) and
//! the message type (3 bits).
//!
//! ### Message Types
//! - 0: CONTROL ITEM - Payload: code (2, LE) + parameters
//! - 1: DATA ITEM
//! - 2: ACK          - Payload: empty
//! - 3: NAK          - Payload: error code (1)
//!
//! ### Control Codes
//! - 0x0001: START IQ      - Parameters: channel, 0x01, capture mode, fifo count
//! - 0x0002: STOP IQ       - Parameters: 0x00, 0x02, 0x00, 0x00
//! - 0x0020: SET FREQUENCY - Parameters: channel id + frequency (5, BE)

mod header;
mod message;
mod params;
mod response;

pub use header::{
    decode_header, encode_header, Header, MessageType, HEADER_SIZE, MAX_MESSAGE_LENGTH,
};
pub use message::{
    serialize, AckMessage, ControlCode, ControlItemMessage, Message, CONTROL_CODE_SIZE,
};
pub use params::{
    encode_frequency, frequency_parameters, receiver_state_parameters, ReceiverStateParams,
    ALL_CHANNELS, FREQUENCY_SIZE,
};
pub use response::{classify_response, Reply};
