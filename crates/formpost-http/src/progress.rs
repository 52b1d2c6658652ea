//! Bytes-sent accounting for in-flight uploads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A snapshot of one upload's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes handed to the transport so far.
    pub sent: u64,
    /// Total body length.
    pub total: u64,
}

/// Callback invoked as an upload's body is streamed out.
pub type ProgressObserver = Arc<dyn Fn(Progress) + Send + Sync>;

/// Shared counter tracking how much of one upload body has been sent.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    sent: Arc<AtomicU64>,
    total: u64,
    observer: Option<ProgressObserver>,
}

impl ProgressTracker {
    /// Create a tracker for a body of the given total length.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            sent: Arc::new(AtomicU64::new(0)),
            total,
            observer: None,
        }
    }

    /// Attach an observer notified on every recorded chunk.
    #[must_use]
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Record `bytes` more of the body as sent.
    pub fn record(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        if let Some(observer) = &self.observer {
            observer(Progress {
                sent,
                total: self.total,
            });
        }
    }

    /// Bytes recorded so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// The current snapshot.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            sent: self.sent(),
            total: self.total,
        }
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("sent", &self.sent())
            .field("total", &self.total)
            .field("observer", &self.observer.as_ref().map(|_| "..."))
            .finish()
    }
}
