//! # Correlator
//!
//! Joins beacon detections with the heading current at their arrival.
//!
//! - [`AllowlistFilter`]: which devices count
//! - [`classify`]: heading → compass sector
//! - [`SessionLog`]: ordered record log, reset per scan and frozen at stop
//! - [`ScanEventCorrelator`]: the glue, called from detection callbacks

mod allowlist;
mod classifier;
pub mod clock;
mod correlator;
mod session;

pub use allowlist::AllowlistFilter;
pub use classifier::classify;
pub use correlator::ScanEventCorrelator;
pub use session::SessionLog;
