//! Pipeline stages
//!
//! The receive stage moves datagrams from the socket into the queue; the
//! persist stage drains the queue into the sink file. Both return their
//! counters and log, rather than raise, their failures.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::net::UdpSocket;
use std::path::Path;

use bytes::Bytes;
use crossbeam::channel::{Receiver, Sender};
use crossbeam::select;

use super::cancel::CancellationToken;

/// Datagrams and bytes handled by one stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounters {
    pub datagrams: u64,
    pub bytes: u64,
}

/// Receive datagrams until cancelled, enqueueing each payload
///
/// The socket must carry a read timeout so a quiet peer does not block
/// cancellation. Dropping `queue` on return closes it for the persist stage.
pub fn receive_stage(
    socket: UdpSocket,
    queue: Sender<Bytes>,
    cancel: CancellationToken,
    max_datagram_size: usize,
) -> StageCounters {
    let mut counters = StageCounters::default();
    let mut buffer = vec![0u8; max_datagram_size];

    while !cancel.is_cancelled() {
        let (len, peer) = match socket.recv_from(&mut buffer) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("Error receiving UDP data: {}", e);
                break;
            }
        };

        tracing::trace!("Received {} byte datagram from {}", len, peer);

        if queue.send(Bytes::copy_from_slice(&buffer[..len])).is_err() {
            tracing::warn!("Sink stage is gone, stopping UDP receiver");
            break;
        }
        counters.datagrams += 1;
        counters.bytes += len as u64;
    }

    if cancel.is_cancelled() {
        tracing::debug!("Cancellation of UDP receiver requested");
    }
    tracing::debug!(
        "UDP receiver exited after {} datagrams ({} bytes)",
        counters.datagrams,
        counters.bytes
    );
    counters
}

/// Write queued datagrams to `sink_path` in arrival order
///
/// The sink is truncated on open and flushed after every datagram. After
/// cancellation the queue is drained until the receive stage closes it.
pub fn persist_stage(
    sink_path: &Path,
    queue: Receiver<Bytes>,
    cancel: CancellationToken,
) -> StageCounters {
    let mut counters = StageCounters::default();

    let mut sink = match File::create(sink_path) {
        Ok(file) => BufWriter::new(file),
        Err(e) => {
            tracing::error!("Failed to open sink {}: {}", sink_path.display(), e);
            return counters;
        }
    };

    let result = loop {
        select! {
            recv(queue) -> msg => match msg {
                Ok(datagram) => {
                    if let Err(e) = write_datagram(&mut sink, &datagram, &mut counters) {
                        break Err(e);
                    }
                }
                // Receive stage finished and nothing is left
                Err(_) => break Ok(()),
            },
            recv(cancel.signal()) -> _ => {
                break drain(&mut sink, &queue, &mut counters);
            }
        }
    };

    if let Err(e) = result {
        tracing::error!("Error writing UDP data to {}: {}", sink_path.display(), e);
    }
    tracing::debug!(
        "Sink writer exited after {} datagrams ({} bytes)",
        counters.datagrams,
        counters.bytes
    );
    counters
}

fn drain<W: Write>(
    sink: &mut W,
    queue: &Receiver<Bytes>,
    counters: &mut StageCounters,
) -> std::io::Result<()> {
    for datagram in queue.iter() {
        write_datagram(sink, &datagram, counters)?;
    }
    Ok(())
}

fn write_datagram<W: Write>(
    sink: &mut W,
    datagram: &[u8],
    counters: &mut StageCounters,
) -> std::io::Result<()> {
    sink.write_all(datagram)?;
    sink.flush()?;
    counters.datagrams += 1;
    counters.bytes += datagram.len() as u64;
    Ok(())
}
