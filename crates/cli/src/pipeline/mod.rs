//! Scan session orchestration.

mod orchestrator;
mod stats;

pub use orchestrator::{ScanRun, ScanRunConfig};
pub use stats::RunStats;
