//! Source counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-source delivery counters
#[derive(Debug, Default)]
pub struct SourceMetrics {
    /// Events handed to the callback
    emitted: AtomicU64,
    /// Times the source started listening
    subscriptions: AtomicU64,
}

impl SourceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subscription(&self) {
        self.subscriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            emitted: self.emitted.load(Ordering::Relaxed),
            subscriptions: self.subscriptions.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub emitted: u64,
    pub subscriptions: u64,
}
