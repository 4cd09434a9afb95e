//! # Scanner
//!
//! The control surface tying sources, orientation, correlation and export
//! together.
//!
//! ```text
//! MotionSource ──▶ OrientationEstimator ──▶ HeadingCell
//!                                               │ (read at arrival)
//! DetectionSource ──▶ [gate] ──▶ ScanEventCorrelator ──▶ SessionLog ──▶ CsvExporter
//!                                               └──▶ RecordSubmitter
//! ```
//!
//! Lifecycle:
//! - `on_foreground` / `on_background` subscribe and release motion sensors
//! - `start_scan` resets the session and starts detections
//! - `stop_scan` stops detections, freezes the session and exports it

mod controller;

pub use controller::{ExportedSession, ScanController, ScanControllerBuilder};
