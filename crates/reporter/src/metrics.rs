//! Reporter counters

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct ReporterMetrics {
    /// Approximate number of queued payloads
    queue_len: AtomicUsize,
    /// Accepted into the queue
    enqueued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    /// Rejected because the queue was full or closed
    dropped: AtomicU64,
}

impl ReporterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
        observability::record_reporter_queue_depth(len);
    }

    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn inc_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn inc_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn inc_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ReporterSnapshot {
        ReporterSnapshot {
            queue_len: self.queue_len(),
            enqueued: self.enqueued(),
            delivered: self.delivered(),
            failed: self.failed(),
            dropped: self.dropped(),
        }
    }
}

/// Point-in-time copy of [`ReporterMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterSnapshot {
    pub queue_len: usize,
    pub enqueued: u64,
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

impl ReporterSnapshot {
    /// Every enqueued payload has reached a final state
    pub fn is_settled(&self) -> bool {
        self.delivered + self.failed == self.enqueued
    }
}
