//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the scanner workspace.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Time Model
//! - Detections carry an epoch timestamp in milliseconds (`timestamp_ms`)
//! - Headings are degrees in `[0, 360)`, 0 = north, clockwise
//! - A detection is correlated with the heading current at its *arrival*

mod blueprint;
mod correlation;
mod detection;
mod device_id;
mod error;
mod heading;
mod motion;
mod record;
mod report;
mod source;
mod transport;

pub use blueprint::*;
pub use correlation::{HeadingSource, RecordSubmitter};
pub use detection::DetectionEvent;
pub use device_id::DeviceId;
pub use error::*;
pub use heading::*;
pub use motion::*;
pub use record::*;
pub use report::ReportPayload;
pub use source::{DetectionCallback, DetectionSource, MotionCallback, MotionSource};
pub use transport::{LocalReportTransport, ReportTransport};
