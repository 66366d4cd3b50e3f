//! Message header
//!
//! Packs and unpacks the 16-bit little-endian header word.
//!
//! ```text
//!  15          11 10     8 7               0
//! ┌──────────────┬────────┬─────────────────┐
//! │ length[12:8] │  type  │   length[7:0]   │
//! └──────────────┴────────┴─────────────────┘
//! ```

use crate::error::{NetSdrError, Result};

/// Header size on the wire
pub const HEADER_SIZE: usize = 2;

/// Largest total frame length a 13-bit field can carry
pub const MAX_MESSAGE_LENGTH: usize = 0x1FFF;

/// Message type carried in bits 8..11 of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    ControlItem,
    DataItem,
    Ack,
    Nak,
    /// Type bits 4..=7, which this protocol does not define. `Header::new`
    /// rejects values outside that range.
    Reserved(u8),
}

impl MessageType {
    /// Build from the 3 type bits (higher bits are ignored)
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MessageType::ControlItem,
            1 => MessageType::DataItem,
            2 => MessageType::Ack,
            3 => MessageType::Nak,
            other => MessageType::Reserved(other),
        }
    }

    /// The 3 type bits
    pub fn bits(self) -> u8 {
        match self {
            MessageType::ControlItem => 0,
            MessageType::DataItem => 1,
            MessageType::Ack => 2,
            MessageType::Nak => 3,
            MessageType::Reserved(bits) => bits & 0x07,
        }
    }
}

/// Decoded message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    length: u16,
    message_type: MessageType,
}

impl Header {
    /// Create a header, rejecting lengths that do not fit in 13 bits
    pub fn new(length: usize, message_type: MessageType) -> Result<Self> {
        if length > MAX_MESSAGE_LENGTH {
            return Err(NetSdrError::InvalidArgument(format!(
                "header length {} out of range (max {})",
                length, MAX_MESSAGE_LENGTH
            )));
        }
        if let MessageType::Reserved(bits) = message_type {
            if !(4..=7).contains(&bits) {
                return Err(NetSdrError::InvalidArgument(format!(
                    "reserved message type bits {} out of range (4..=7)",
                    bits
                )));
            }
        }

        Ok(Self {
            length: length as u16,
            message_type,
        })
    }

    /// Total frame length in bytes, header included
    pub fn length(&self) -> usize {
        self.length as usize
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Payload length implied by the header (0 when length < 2)
    pub fn payload_length(&self) -> usize {
        self.length().saturating_sub(HEADER_SIZE)
    }

    /// Encode to the 2-byte wire form
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let low = self.length & 0x00FF;
        let high = (self.length >> 8) & 0x1F;
        let type_bits = u16::from(self.message_type.bits());

        let word = (high << 11) | (type_bits << 8) | low;
        word.to_le_bytes()
    }

    /// Decode from the first 2 bytes of `bytes`
    ///
    /// Every 2-byte pattern is a valid header; only short input is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(NetSdrError::InvalidArgument(format!(
                "header requires {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let word = u16::from_le_bytes([bytes[0], bytes[1]]);
        let low = word & 0x00FF;
        let type_bits = ((word >> 8) & 0x07) as u8;
        let high = (word >> 11) & 0x1F;

        Ok(Self {
            length: (high << 8) | low,
            message_type: MessageType::from_bits(type_bits),
        })
    }
}

/// Encode a header straight from its parts
pub fn encode_header(length: usize, message_type: MessageType) -> Result<[u8; HEADER_SIZE]> {
    Ok(Header::new(length, message_type)?.to_bytes())
}

/// Decode a header from raw bytes
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    Header::from_bytes(bytes)
}
