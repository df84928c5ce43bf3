//! Forwarding statistics
//!
//! Thread-safe counters shared between callers (enqueue side) and the
//! worker (send side). Uses lock-free atomics for all operations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Forwarding counters (fully lock-free)
#[derive(Debug, Default)]
pub struct Stats {
    /// Lines accepted into the queue
    enqueued: AtomicU64,
    /// Datagrams handed to the OS successfully
    sent: AtomicU64,
    /// Lines lost (send failure or forwarder closed)
    dropped: AtomicU64,
    /// Payload bytes sent
    bytes_sent: AtomicU64,
}

/// Point-in-time copy of `Stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub enqueued: u64,
    pub sent: u64,
    pub dropped: u64,
    pub bytes_sent: u64,
}

impl StatsSnapshot {
    /// Lines enqueued but not yet sent or dropped
    pub fn pending(&self) -> u64 {
        self.enqueued.saturating_sub(self.sent + self.dropped)
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_sent(&self, bytes: usize) {
        self.sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }
}
