//! Response classification
//!
//! Interprets one complete response frame read from the control channel.

use bytes::Bytes;

use super::header::{Header, MessageType, HEADER_SIZE};
use super::message::AckMessage;
use crate::error::{NetSdrError, Result};

/// A response that acknowledged the command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Explicit acknowledgment
    Ack(AckMessage),

    /// The device echoed a control item back; carries the raw payload
    ControlItem { header: Header, payload: Bytes },
}

impl Reply {
    pub fn header(&self) -> Header {
        match self {
            Reply::Ack(ack) => ack.header(),
            Reply::ControlItem { header, .. } => *header,
        }
    }
}

/// Classify a raw response frame
///
/// ACK and echoed control items succeed, NAK fails with the peer's error code
/// (first payload byte, 0 when there is none) and any other type fails as a
/// protocol error.
pub fn classify_response(frame: &[u8]) -> Result<Reply> {
    let header = Header::from_bytes(frame)?;

    let available = frame.len().saturating_sub(HEADER_SIZE);
    if available < header.payload_length() {
        return Err(NetSdrError::Protocol(format!(
            "truncated response: header declares {} bytes, got {}",
            header.length(),
            frame.len()
        )));
    }
    let payload = &frame[HEADER_SIZE..HEADER_SIZE + header.payload_length()];

    match header.message_type() {
        MessageType::Ack => {
            tracing::debug!("Received ACK");
            Ok(Reply::Ack(AckMessage::new(header)))
        }
        MessageType::ControlItem => {
            tracing::debug!("Received control item response ({} byte payload)", payload.len());
            Ok(Reply::ControlItem {
                header,
                payload: Bytes::copy_from_slice(payload),
            })
        }
        MessageType::Nak => {
            let code = payload.first().copied().unwrap_or(0);
            tracing::warn!("Received NAK with error code {}", code);
            Err(NetSdrError::Nak { code })
        }
        other @ (MessageType::DataItem | MessageType::Reserved(_)) => Err(NetSdrError::Protocol(
            format!("unexpected response type: {:?}", other),
        )),
    }
}
