//! Seams between the correlator and its collaborators.

use crate::{CorrelatedRecord, HeadingReading};

/// Anything that can answer "what is the heading right now"
///
/// Must be a single atomic read: callers run on detection callback threads
/// concurrently with motion updates.
pub trait HeadingSource: Send + Sync {
    fn current_heading(&self) -> HeadingReading;
}

/// Receives each record after it is appended to the session.
///
/// Implementations must not block the caller.
pub trait RecordSubmitter: Send + Sync {
    fn submit(&self, record: &CorrelatedRecord);
}
