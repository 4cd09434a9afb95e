//! # Ingestion
//!
//! Event sources behind the `MotionSource` / `DetectionSource` contracts.
//!
//! Platform sensor and scanner bindings live outside this workspace; these
//! sources stand in for them in the CLI and in tests:
//!
//! - [`MockMotionSource`] / [`MockDetectionSource`]: background threads
//!   emitting synthetic events at a fixed rate
//! - [`ManualMotionSource`] / [`ManualDetectionSource`]: events pushed by the
//!   caller, for deterministic tests
//!
//! ```ignore
//! use ingestion::{HeadingProfile, MockMotionConfig, MockMotionSource};
//!
//! let config = MockMotionConfig {
//!     rate_hz: 15.0,
//!     profile: HeadingProfile::Rotating { start_deg: 0.0, deg_per_sec: 20.0 },
//! };
//! let sources = MockMotionSource::set_for(estimator.required_sensors(), &config);
//! ```

mod detection;
mod listener;
mod metrics;
mod motion;

pub use detection::{ManualDetectionSource, MockDetectionConfig, MockDetectionSource};
pub use metrics::{SourceMetrics, SourceSnapshot};
pub use motion::{
    HeadingProfile, ManualHeading, ManualMotionSource, MockMotionConfig, MockMotionSource,
};
