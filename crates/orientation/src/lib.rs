//! # Orientation
//!
//! Compass heading from motion sensors.
//!
//! Two strategies:
//! - **DirectVector**: the platform's fused rotation vector
//! - **Composite**: accelerometer + magnetometer, optionally remapped for
//!   the display rotation
//!
//! `OrientationEstimator` picks one at construction and publishes every
//! update to a lock-free [`HeadingCell`].

mod cell;
mod estimator;
pub mod rotation;
mod strategy;
pub mod synth;

pub use cell::HeadingCell;
pub use estimator::OrientationEstimator;
pub use strategy::{
    CompositeFusion, DirectVectorFusion, FusionOutcome, FusionStrategy, HeadingFusion, StrategyKind,
};
