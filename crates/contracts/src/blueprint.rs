//! ScanBlueprint - Config Loader output
//!
//! Describes a complete scanner setup: allowlist, orientation fusion,
//! remote reporting and session export.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::{DisplayRotation, MotionSensorKind};

/// Beacons of the original deployment, used when no allowlist is configured
pub const DEFAULT_ALLOWLIST: [&str; 6] = [
    "60:98:66:32:98:58",
    "60:98:66:32:8E:28",
    "60:98:66:32:BC:AC",
    "60:98:66:30:A9:6E",
    "60:98:66:32:CA:74",
    "60:98:66:2F:CF:9F",
];

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete scanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ScanBlueprint {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    #[validate(nested)]
    pub allowlist: AllowlistConfig,

    #[serde(default)]
    #[validate(nested)]
    pub orientation: OrientationConfig,

    #[serde(default)]
    #[validate(nested)]
    pub reporter: ReporterConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Devices eligible for correlation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AllowlistConfig {
    /// Hardware addresses, matched exactly
    #[serde(default = "default_allowlist")]
    #[validate(length(min = 1, message = "allowlist must contain at least one device"))]
    pub devices: Vec<String>,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            devices: default_allowlist(),
        }
    }
}

fn default_allowlist() -> Vec<String> {
    DEFAULT_ALLOWLIST.iter().map(|s| s.to_string()).collect()
}

/// Which fusion strategy the estimator should run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionPreference {
    /// Rotation vector if present, otherwise accelerometer + magnetometer
    #[default]
    Auto,
    /// Rotation vector only
    DirectVector,
    /// Accelerometer + magnetometer only
    Composite,
}

/// Orientation estimator settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrientationConfig {
    #[serde(default)]
    pub strategy: FusionPreference,

    /// Current screen rotation, applied when `remap_axes` is set
    #[serde(default)]
    pub display_rotation: DisplayRotation,

    /// Remap the composite rotation matrix for `display_rotation`
    #[serde(default = "default_true")]
    pub remap_axes: bool,

    /// Sensors present on this device
    #[serde(default = "default_available_sensors")]
    pub available_sensors: Vec<MotionSensorKind>,

    /// Requested motion sample rate (Hz)
    #[serde(default = "default_sample_rate_hz")]
    #[validate(range(exclusive_min = 0.0, message = "sample_rate_hz must be > 0"))]
    pub sample_rate_hz: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            strategy: FusionPreference::default(),
            display_rotation: DisplayRotation::default(),
            remap_axes: true,
            available_sensors: default_available_sensors(),
            sample_rate_hz: default_sample_rate_hz(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_available_sensors() -> Vec<MotionSensorKind> {
    MotionSensorKind::ALL.to_vec()
}

fn default_sample_rate_hz() -> f64 {
    // Roughly the platform's "UI" sensor delay
    15.0
}

/// Remote collector settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReporterConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Full collector URL, e.g. `https://collector.example/api/current_rssi`
    #[serde(default)]
    #[validate(url(message = "endpoint must be a valid URL"))]
    pub endpoint: Option<String>,

    /// Stable identifier of this scanning device
    #[serde(default = "default_local_device_id")]
    #[validate(length(min = 1, message = "local_device_id cannot be empty"))]
    pub local_device_id: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_ms")]
    #[validate(range(min = 1, message = "timeout_ms must be >= 1"))]
    pub timeout_ms: u64,

    /// Pending payloads before new ones are dropped
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1, message = "queue_capacity must be >= 1"))]
    pub queue_capacity: usize,

    /// Concurrent in-flight requests
    #[serde(default = "default_workers")]
    #[validate(range(min = 1, max = 64, message = "workers must be within 1..=64"))]
    pub workers: usize,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            local_device_id: default_local_device_id(),
            timeout_ms: default_timeout_ms(),
            queue_capacity: default_queue_capacity(),
            workers: default_workers(),
        }
    }
}

fn default_local_device_id() -> String {
    "unknown-device".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_queue_capacity() -> usize {
    256
}

fn default_workers() -> usize {
    4
}

/// Time zone used to format record timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockZone {
    #[default]
    Local,
    Utc,
}

/// Session export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `<session>.csv`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub clock: ClockZone,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            clock: ClockZone::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blueprint_is_valid() {
        let bp = ScanBlueprint::default();
        assert!(bp.validate().is_ok());
        assert_eq!(bp.allowlist.devices.len(), 6);
        assert!(!bp.reporter.enabled);
    }

    #[test]
    fn test_field_rules() {
        let mut bp = ScanBlueprint::default();
        bp.reporter.workers = 0;
        bp.reporter.endpoint = Some("not a url".to_string());
        let errors = bp.validate().unwrap_err().to_string();
        assert!(errors.contains("workers"));
        assert!(errors.contains("endpoint"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let bp: ScanBlueprint = serde_json::from_str(r#"{"reporter": {"enabled": true}}"#).unwrap();
        assert!(bp.reporter.enabled);
        assert_eq!(bp.reporter.timeout_ms, 5_000);
        assert_eq!(bp.orientation.strategy, FusionPreference::Auto);
        assert_eq!(bp.export.clock, ClockZone::Local);
    }
}
