//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{FusionPreference, MotionSensorKind, ScanBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    allowlist_size: usize,
    strategy: String,
    reporting: bool,
    output_dir: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    allowlist_size: blueprint.allowlist.devices.len(),
                    strategy: format!("{:?}", blueprint.orientation.strategy),
                    reporting: blueprint.reporter.enabled,
                    output_dir: blueprint.export.output_dir.display().to_string(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ScanBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let orientation = &blueprint.orientation;
    let has = |kind: MotionSensorKind| orientation.available_sensors.contains(&kind);

    let direct = has(MotionSensorKind::RotationVector);
    let composite = has(MotionSensorKind::Accelerometer) && has(MotionSensorKind::MagneticField);
    let usable = match orientation.strategy {
        FusionPreference::Auto => direct || composite,
        FusionPreference::DirectVector => direct,
        FusionPreference::Composite => composite,
    };
    if !usable {
        warnings.push(format!(
            "orientation.strategy {:?} cannot run with sensors {:?} - heading will stay unavailable",
            orientation.strategy, orientation.available_sensors
        ));
    }

    if !blueprint.reporter.enabled {
        warnings.push("Remote reporting disabled - records are only exported to CSV".to_string());
    } else if blueprint.reporter.local_device_id == "unknown-device" {
        warnings.push("reporter.local_device_id not set - payloads carry 'unknown-device'".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Allowlist: {} devices", summary.allowlist_size);
            println!("  Strategy: {}", summary.strategy);
            println!("  Reporting: {}", if summary.reporting { "enabled" } else { "disabled" });
            println!("  Output dir: {}", summary.output_dir);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
