//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::ScanBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::config::load_blueprint;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    allowlist: AllowlistInfo,
    orientation: OrientationInfo,
    reporter: ReporterInfo,
    export: ExportInfo,
}

#[derive(Serialize)]
struct AllowlistInfo {
    count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    devices: Vec<String>,
}

#[derive(Serialize)]
struct OrientationInfo {
    strategy: String,
    available_sensors: Vec<String>,
    display_rotation: String,
    remap_axes: bool,
    sample_rate_hz: f64,
}

#[derive(Serialize)]
struct ReporterInfo {
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    local_device_id: String,
    timeout_ms: u64,
    queue_capacity: usize,
    workers: usize,
}

#[derive(Serialize)]
struct ExportInfo {
    output_dir: String,
    clock: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    match args.config {
        Some(ref path) => info!(config = %path.display(), "Loading configuration info"),
        None => info!("Showing default configuration"),
    }

    let blueprint = load_blueprint(args.config.as_deref()).context("Failed to load configuration")?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &ScanBlueprint, args: &InfoArgs) -> ConfigInfo {
    let orientation = &blueprint.orientation;
    let reporter = &blueprint.reporter;

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        allowlist: AllowlistInfo {
            count: blueprint.allowlist.devices.len(),
            devices: if args.devices {
                blueprint.allowlist.devices.clone()
            } else {
                Vec::new()
            },
        },
        orientation: OrientationInfo {
            strategy: format!("{:?}", orientation.strategy),
            available_sensors: orientation
                .available_sensors
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
            display_rotation: format!("{:?}", orientation.display_rotation),
            remap_axes: orientation.remap_axes,
            sample_rate_hz: orientation.sample_rate_hz,
        },
        reporter: ReporterInfo {
            enabled: reporter.enabled,
            endpoint: reporter.endpoint.clone(),
            local_device_id: reporter.local_device_id.clone(),
            timeout_ms: reporter.timeout_ms,
            queue_capacity: reporter.queue_capacity,
            workers: reporter.workers,
        },
        export: ExportInfo {
            output_dir: blueprint.export.output_dir.display().to_string(),
            clock: format!("{:?}", blueprint.export.clock),
        },
    }
}

fn print_config_info(blueprint: &ScanBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Beacon Scanner Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let devices = &blueprint.allowlist.devices;
    println!("📡 Allowlist ({})", devices.len());
    if args.devices {
        for (i, device) in devices.iter().enumerate() {
            let prefix = if i == devices.len() - 1 { "└─" } else { "├─" };
            println!("   {} {}", prefix, device);
        }
    } else {
        println!("   └─ {} devices (--devices to list)", devices.len());
    }

    let orientation = &blueprint.orientation;
    println!("\n🧭 Orientation");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Strategy: {:?}", orientation.strategy);
    println!("   ├─ Sensors: {:?}", orientation.available_sensors);
    println!(
        "   ├─ Display rotation: {:?} (remap: {})",
        orientation.display_rotation, orientation.remap_axes
    );
    println!("   └─ Sample rate: {} Hz", orientation.sample_rate_hz);

    let reporter = &blueprint.reporter;
    println!("\n📤 Reporter");
    if reporter.enabled {
        println!(
            "   ├─ Endpoint: {}",
            reporter.endpoint.as_deref().unwrap_or("(missing)")
        );
        println!("   ├─ Local device id: {}", reporter.local_device_id);
        println!("   ├─ Timeout: {} ms", reporter.timeout_ms);
        println!(
            "   └─ Workers: {} (queue {})",
            reporter.workers, reporter.queue_capacity
        );
    } else {
        println!("   └─ Disabled");
    }

    println!("\n💾 Export");
    println!("   ├─ Output dir: {}", blueprint.export.output_dir.display());
    println!("   └─ Clock: {:?}", blueprint.export.clock);

    println!();
}
