//! Listening state shared by every source

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Listening flag plus a subscription generation
///
/// A delivery thread keeps running only while the source is listening *and*
/// its generation is current. A quick `stop` + `listen` therefore retires
/// the old thread instead of leaving two delivering at once.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListenState {
    listening: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl ListenState {
    /// Begin a subscription; `None` if one is already active
    pub(crate) fn begin(&self) -> Option<Subscription> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return None;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Some(Subscription {
            state: self.clone(),
            generation,
        })
    }

    pub(crate) fn end(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

/// Token held by one delivery thread
#[derive(Debug)]
pub(crate) struct Subscription {
    state: ListenState,
    generation: u64,
}

impl Subscription {
    pub(crate) fn is_active(&self) -> bool {
        self.state.is_listening() && self.state.generation.load(Ordering::SeqCst) == self.generation
    }
}
