//! Control item parameter encoders
//!
//! Builds the parameter bytes for the receiver state and frequency items.

use super::message::ControlCode;
use crate::error::{NetSdrError, Result};

/// Width of the frequency field on the wire
pub const FREQUENCY_SIZE: usize = 5;

/// Channel id addressing all channels
pub const ALL_CHANNELS: u8 = 0xFF;

/// Tunable fields of a receiver state request
///
/// Only used by StartIQ; StopIQ sends fixed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStateParams {
    /// Data channel/type specifier
    pub channel_specifier: u8,
    pub capture_mode: u8,
    pub fifo_count: u8,
}

impl Default for ReceiverStateParams {
    fn default() -> Self {
        Self {
            channel_specifier: 0x80,
            capture_mode: 0x80,
            fifo_count: 0x00,
        }
    }
}

/// Parameter bytes for a receiver state request
pub fn receiver_state_parameters(code: ControlCode, params: ReceiverStateParams) -> Result<[u8; 4]> {
    match code {
        ControlCode::StartIq => Ok([
            params.channel_specifier,
            ControlCode::StartIq.as_byte(),
            params.capture_mode,
            params.fifo_count,
        ]),
        // Positions 1, 3 and 4 are ignored by the receiver
        ControlCode::StopIq => Ok([
            ControlCode::Default.as_byte(),
            ControlCode::StopIq.as_byte(),
            ControlCode::Default.as_byte(),
            ControlCode::Default.as_byte(),
        ]),
        other => Err(NetSdrError::InvalidArgument(format!(
            "invalid control item code for receiver state: {:?}",
            other
        ))),
    }
}

/// Encode a frequency as 5 bytes, most significant first
///
/// Bits above 40 are dropped.
pub fn encode_frequency(frequency_hz: u64) -> [u8; FREQUENCY_SIZE] {
    let be = frequency_hz.to_be_bytes();
    let mut out = [0u8; FREQUENCY_SIZE];
    out.copy_from_slice(&be[be.len() - FREQUENCY_SIZE..]);
    out
}

/// Parameter bytes for a frequency request: channel id then frequency
pub fn frequency_parameters(frequency_hz: u64, channel_id: u8) -> [u8; 1 + FREQUENCY_SIZE] {
    let mut out = [0u8; 1 + FREQUENCY_SIZE];
    out[0] = channel_id;
    out[1..].copy_from_slice(&encode_frequency(frequency_hz));
    out
}
