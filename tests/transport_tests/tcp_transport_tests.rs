//! Transport Tests
//!
//! Tests for exact-length framing and the TCP transport lifecycle.

use std::io::{Cursor, Read, Write};
use std::net::{IpAddr, Ipv4Addr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use netsdr::transport::{read_exact_bytes, read_frame};
use netsdr::{NetSdrError, TcpTransport, Transport};

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

// =============================================================================
// Helper Functions
// =============================================================================

/// Reader that hands out at most one byte per call
struct Trickle<R>(R);

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(1);
        self.0.read(&mut buf[..len])
    }
}

/// Start a one-shot peer that runs `script` on the accepted stream
fn spawn_peer<F>(script: F) -> (u16, thread::JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind((LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        script(stream);
    });
    (port, handle)
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_read_frame_ack() {
    let mut cursor = Cursor::new(vec![0x02, 0x02]);
    let frame = read_frame(&mut cursor).unwrap();

    assert_eq!(&frame[..], &[0x02, 0x02]);
}

#[test]
fn test_read_frame_with_payload() {
    let mut cursor = Cursor::new(vec![0x05, 0x00, 0xAA, 0xBB, 0xCC]);
    let frame = read_frame(&mut cursor).unwrap();

    assert_eq!(&frame[..], &[0x05, 0x00, 0xAA, 0xBB, 0xCC]);
}

#[test]
fn test_read_frame_stops_at_declared_length() {
    // Two frames back to back
    let mut cursor = Cursor::new(vec![0x03, 0x03, 0x05, 0x02, 0x02]);

    assert_eq!(&read_frame(&mut cursor).unwrap()[..], &[0x03, 0x03, 0x05]);
    assert_eq!(&read_frame(&mut cursor).unwrap()[..], &[0x02, 0x02]);
}

#[test]
fn test_read_frame_accumulates_short_reads() {
    let mut reader = Trickle(Cursor::new(vec![0x08, 0x00, 0x01, 0x00, 0x80, 0x01, 0x80, 0x00]));
    let frame = read_frame(&mut reader).unwrap();

    assert_eq!(frame.len(), 8);
    assert_eq!(&frame[4..], &[0x80, 0x01, 0x80, 0x00]);
}

#[test]
fn test_read_frame_empty_stream_is_end_of_stream() {
    let mut cursor = Cursor::new(Vec::new());
    let err = read_frame(&mut cursor).unwrap_err();

    assert!(matches!(
        err,
        NetSdrError::EndOfStream {
            expected: 2,
            received: 0
        }
    ));
    assert!(err.is_connection_error());
}

#[test]
fn test_read_frame_truncated_payload() {
    // Declares 6 bytes, delivers 3
    let mut cursor = Cursor::new(vec![0x06, 0x00, 0x01]);
    let err = read_frame(&mut cursor).unwrap_err();

    assert!(matches!(
        err,
        NetSdrError::EndOfStream {
            expected: 4,
            received: 1
        }
    ));
}

#[test]
fn test_read_frame_rejects_length_below_header() {
    let mut cursor = Cursor::new(vec![0x01, 0x02]);

    assert!(matches!(
        read_frame(&mut cursor),
        Err(NetSdrError::Protocol(_))
    ));
}

#[test]
fn test_read_exact_bytes_zero_count() {
    let mut cursor = Cursor::new(Vec::new());

    assert!(read_exact_bytes(&mut cursor, 0).unwrap().is_empty());
}

// =============================================================================
// TCP Lifecycle Tests
// =============================================================================

#[test]
fn test_connect_send_receive() {
    let (port, peer) = spawn_peer(|mut stream| {
        let mut request = [0u8; 8];
        stream.read_exact(&mut request).unwrap();
        assert_eq!(request, [0x08, 0x00, 0x01, 0x00, 0x80, 0x01, 0x80, 0x00]);
        stream.write_all(&[0x02, 0x02]).unwrap();
    });

    let mut transport = TcpTransport::new();
    transport.connect(LOCALHOST, port).unwrap();
    assert!(transport.is_connected());
    assert_eq!(transport.peer_addr().unwrap().port(), port);

    transport
        .send(&[0x08, 0x00, 0x01, 0x00, 0x80, 0x01, 0x80, 0x00])
        .unwrap();
    let frame = transport.receive().unwrap();
    assert_eq!(&frame[..], &[0x02, 0x02]);

    peer.join().unwrap();
    transport.disconnect().unwrap();
    assert!(!transport.is_connected());
}

#[test]
fn test_receive_fragmented_frame() {
    let (port, peer) = spawn_peer(|mut stream| {
        for byte in [0x05, 0x00, 0x20, 0x00, 0xFF] {
            stream.write_all(&[byte]).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(5));
        }
    });

    let mut transport = TcpTransport::new();
    transport.connect(LOCALHOST, port).unwrap();

    let frame = transport.receive().unwrap();
    assert_eq!(&frame[..], &[0x05, 0x00, 0x20, 0x00, 0xFF]);

    peer.join().unwrap();
}

#[test]
fn test_receive_peer_closes_mid_frame() {
    let (port, peer) = spawn_peer(|mut stream| {
        stream.write_all(&[0x0A, 0x00, 0x20]).unwrap();
        // Dropping the stream closes it
    });

    let mut transport = TcpTransport::new();
    transport.connect(LOCALHOST, port).unwrap();
    peer.join().unwrap();

    let err = transport.receive().unwrap_err();
    assert!(matches!(
        err,
        NetSdrError::EndOfStream {
            expected: 8,
            received: 1
        }
    ));
}

#[test]
fn test_connect_refused() {
    let port = {
        let listener = TcpListener::bind((LOCALHOST, 0)).unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut transport = TcpTransport::new();
    let err = transport.connect(LOCALHOST, port).unwrap_err();

    assert!(matches!(err, NetSdrError::Connection { source: Some(_), .. }));
    assert!(!transport.is_connected());
}

#[test]
fn test_send_when_not_connected() {
    let mut transport = TcpTransport::new();
    let err = transport.send(&[0x02, 0x02]).unwrap_err();

    assert!(err.is_connection_error());
}

#[test]
fn test_receive_when_not_connected() {
    let mut transport = TcpTransport::new();

    assert!(transport.receive().unwrap_err().is_connection_error());
}

#[test]
fn test_disconnect_twice() {
    let (port, peer) = spawn_peer(|stream| {
        let mut buf = [0u8; 1];
        let _ = (&stream).read(&mut buf);
    });

    let mut transport = TcpTransport::new();
    transport.connect(LOCALHOST, port).unwrap();
    transport.disconnect().unwrap();
    peer.join().unwrap();

    // The transport itself does not swallow a disconnect without a stream
    let err = transport.disconnect().unwrap_err();
    assert!(matches!(err, NetSdrError::Connection { .. }));
    assert!(!transport.is_connected());
}

#[test]
fn test_connect_twice_is_invalid_state() {
    let (port, peer) = spawn_peer(|stream| {
        let mut buf = [0u8; 1];
        let _ = (&stream).read(&mut buf);
    });

    let mut transport = TcpTransport::new();
    transport.connect(LOCALHOST, port).unwrap();

    assert!(matches!(
        transport.connect(LOCALHOST, port),
        Err(NetSdrError::InvalidState(_))
    ));

    transport.disconnect().unwrap();
    peer.join().unwrap();
}
