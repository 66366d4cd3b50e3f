//! Stream framing helpers
//!
//! Exact-length reads over any `Read`.

use std::io::{ErrorKind, Read};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{NetSdrError, Result};
use crate::protocol::{Header, HEADER_SIZE};

/// Read exactly `count` bytes, looping over short reads
///
/// A zero-length read means the peer closed the stream and is reported as
/// `EndOfStream` with the number of bytes received so far.
pub fn read_exact_bytes<R: Read>(reader: &mut R, count: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; count];
    let mut offset = 0;

    while offset < count {
        match reader.read(&mut buffer[offset..]) {
            Ok(0) => {
                return Err(NetSdrError::EndOfStream {
                    expected: count,
                    received: offset,
                })
            }
            Ok(n) => offset += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(NetSdrError::connection("failed to read from stream", e)),
        }
    }

    Ok(buffer)
}

/// Read one complete frame: the header, then `length - 2` payload bytes
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Bytes> {
    let header_bytes = read_exact_bytes(reader, HEADER_SIZE)?;
    let header = Header::from_bytes(&header_bytes)?;

    if header.length() < HEADER_SIZE {
        return Err(NetSdrError::Protocol(format!(
            "frame length {} is shorter than the header",
            header.length()
        )));
    }

    let payload_len = header.payload_length();
    let mut frame = BytesMut::with_capacity(header.length());
    frame.put_slice(&header_bytes);
    if payload_len > 0 {
        frame.put_slice(&read_exact_bytes(reader, payload_len)?);
    }

    tracing::trace!(
        "Received frame: type={:?}, length={}",
        header.message_type(),
        header.length()
    );

    Ok(frame.freeze())
}
