//! Message definitions
//!
//! Outgoing messages and their serialization. Each message fixes its header
//! from its own payload when constructed.

use bytes::{BufMut, Bytes, BytesMut};

use super::header::{Header, MessageType, HEADER_SIZE};
use crate::error::Result;

/// Size of the control item code that leads a control item payload
pub const CONTROL_CODE_SIZE: usize = 2;

/// Control item codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ControlCode {
    Default = 0x0000,
    StartIq = 0x0001,
    StopIq = 0x0002,
    SetFrequency = 0x0020,
}

impl ControlCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Low byte of the code, as embedded in receiver state parameters
    pub fn as_byte(self) -> u8 {
        (self as u16 & 0x00FF) as u8
    }
}

/// A control item request: 2-byte code followed by parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlItemMessage {
    header: Header,
    code: ControlCode,
    parameters: Bytes,
}

impl ControlItemMessage {
    /// Build a control item, failing if the frame would exceed the 13-bit length
    pub fn new(code: ControlCode, parameters: impl Into<Bytes>) -> Result<Self> {
        let parameters = parameters.into();
        let length = HEADER_SIZE + CONTROL_CODE_SIZE + parameters.len();
        let header = Header::new(length, MessageType::ControlItem)?;

        Ok(Self {
            header,
            code,
            parameters,
        })
    }

    /// Build a control item with no parameters
    pub fn without_parameters(code: ControlCode) -> Result<Self> {
        Self::new(code, Bytes::new())
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn code(&self) -> ControlCode {
        self.code
    }

    pub fn parameters(&self) -> &[u8] {
        &self.parameters
    }

    pub fn payload(&self) -> Bytes {
        let mut payload = BytesMut::with_capacity(CONTROL_CODE_SIZE + self.parameters.len());
        payload.put_u16_le(self.code.as_u16());
        payload.put_slice(&self.parameters);
        payload.freeze()
    }
}

/// Acknowledgment: echoes a header and carries no payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckMessage {
    header: Header,
}

impl AckMessage {
    pub fn new(header: Header) -> Self {
        Self { header }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn payload(&self) -> Bytes {
        Bytes::new()
    }
}

/// Closed set of messages this client serializes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ControlItem(ControlItemMessage),
    Ack(AckMessage),
}

impl Message {
    pub fn header(&self) -> Header {
        match self {
            Message::ControlItem(message) => message.header(),
            Message::Ack(message) => message.header(),
        }
    }

    pub fn payload(&self) -> Bytes {
        match self {
            Message::ControlItem(message) => message.payload(),
            Message::Ack(message) => message.payload(),
        }
    }

    /// Header bytes followed by payload bytes
    pub fn to_bytes(&self) -> Bytes {
        let payload = self.payload();

        let mut frame = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        frame.put_slice(&self.header().to_bytes());
        frame.put_slice(&payload);
        frame.freeze()
    }
}

impl From<ControlItemMessage> for Message {
    fn from(message: ControlItemMessage) -> Self {
        Message::ControlItem(message)
    }
}

impl From<AckMessage> for Message {
    fn from(message: AckMessage) -> Self {
        Message::Ack(message)
    }
}

/// Serialize any message to its wire form
pub fn serialize(message: &Message) -> Bytes {
    message.to_bytes()
}
