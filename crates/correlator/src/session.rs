//! SessionLog - ordered, append-only record log for one scan

use std::sync::{Mutex, MutexGuard};

use contracts::{ContractError, CorrelatedRecord, RecordDraft};
use tracing::{debug, warn};

#[derive(Debug)]
struct SessionState {
    records: Vec<CorrelatedRecord>,
    next_seq: u64,
    frozen: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_seq: 1,
            frozen: false,
        }
    }
}

/// Records of the current scan session
///
/// Sequence numbers are assigned under the same lock as the push, so they
/// are contiguous from 1 and match insertion order.
#[derive(Debug, Default)]
pub struct SessionLog {
    state: Mutex<SessionState>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panicking appender cannot leave the state half-updated
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clear records, restart numbering at 1 and unfreeze
    pub fn reset(&self) {
        let mut state = self.lock();
        let dropped = state.records.len();
        *state = SessionState::default();
        debug!(dropped, "Session log reset");
    }

    /// Seal `draft` with the next sequence number and store it
    pub fn append(&self, draft: RecordDraft) -> Result<CorrelatedRecord, ContractError> {
        let mut state = self.lock();
        if state.frozen {
            warn!(device_id = %draft.device_id, "Append after freeze rejected");
            return Err(ContractError::SessionFrozen {
                device_id: draft.device_id.to_string(),
            });
        }

        let record = draft.into_record(state.next_seq);
        state.next_seq += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    /// Make the log read-only until the next reset
    pub fn freeze(&self) {
        let mut state = self.lock();
        state.frozen = true;
        debug!(records = state.records.len(), "Session log frozen");
    }

    /// Ordered copy of every record
    pub fn snapshot_all(&self) -> Vec<CorrelatedRecord> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.lock().frozen
    }
}
