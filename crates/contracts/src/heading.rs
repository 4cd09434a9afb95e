//! Heading and compass sector types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize any finite angle in degrees into `[0, 360)`.
///
/// Non-finite input maps to 0.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Whether a heading value is backed by a live fusion strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStatus {
    /// No fusion strategy has produced a value yet (or none exists)
    #[default]
    Unavailable,
    Available,
}

/// One atomic read of the current heading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingReading {
    /// Degrees in `[0, 360)`. Always 0 while unavailable.
    pub degrees: f64,
    pub status: HeadingStatus,
}

impl HeadingReading {
    pub const UNAVAILABLE: HeadingReading = HeadingReading {
        degrees: 0.0,
        status: HeadingStatus::Unavailable,
    };

    /// Available reading; the angle is normalized.
    pub fn available(degrees: f64) -> Self {
        Self {
            degrees: normalize_degrees(degrees),
            status: HeadingStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == HeadingStatus::Available
    }

    /// Integer snapshot (truncated, never rounded); `None` while unavailable.
    pub fn truncated(&self) -> Option<u16> {
        self.is_available()
            .then(|| (self.degrees.trunc() as u16).min(359))
    }
}

/// One of the eight compass sectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassSector {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassSector {
    pub const ALL: [CompassSector; 8] = [
        CompassSector::N,
        CompassSector::NE,
        CompassSector::E,
        CompassSector::SE,
        CompassSector::S,
        CompassSector::SW,
        CompassSector::W,
        CompassSector::NW,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for CompassSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
