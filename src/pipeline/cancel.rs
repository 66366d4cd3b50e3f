//! Cancellation signal shared by the pipeline stages

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

struct Inner {
    cancelled: AtomicBool,

    /// Dropped on cancel, which disconnects `signal`
    trigger: Mutex<Option<Sender<()>>>,

    signal: Receiver<()>,
}

/// One-shot cancellation signal
///
/// Clones observe the same signal. Stages can poll `is_cancelled` or wait on
/// `signal()` inside a `crossbeam::select!`; the receiver becomes ready
/// (disconnected) once the token is cancelled.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Fire the signal. Returns false if it had already fired.
    pub fn cancel(&self) -> bool {
        let trigger = self.inner.trigger.lock().take();
        self.inner.cancelled.store(true, Ordering::Release);
        let fired = trigger.is_some();
        drop(trigger);
        fired
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that is ready once the token is cancelled
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
