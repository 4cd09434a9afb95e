//! `run` command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use contracts::ScanBlueprint;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::config::{apply_overrides, load_blueprint};
use crate::pipeline::{ScanRun, ScanRunConfig};

/// Execute the `run` command
pub async fn run_scan(args: &RunArgs) -> Result<()> {
    let mut blueprint =
        load_blueprint(args.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut blueprint, args).context("Invalid configuration after overrides")?;

    let session_name = args
        .session_name
        .clone()
        .unwrap_or_else(default_session_name);
    exporter::validate_session_name(&session_name)?;

    info!(
        allowlist = blueprint.allowlist.devices.len(),
        strategy = ?blueprint.orientation.strategy,
        reporting = blueprint.reporter.enabled,
        output_dir = %blueprint.export.output_dir.display(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint, &session_name);
        return Ok(());
    }

    let config = ScanRunConfig {
        blueprint,
        duration: if args.duration == 0 {
            None
        } else {
            Some(Duration::from_secs(args.duration))
        },
        session_name,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
        turn_rate: args.turn_rate,
        detection_rate: args.detection_rate,
        foreign_beacons: args.foreign_beacons,
    };

    let stats = ScanRun::new(config)
        .run(shutdown_signal())
        .await
        .context("Scan failed")?;

    info!(
        records = stats.records,
        detections = stats.detections_heard,
        duration_secs = stats.duration.as_secs_f64(),
        "Scan completed"
    );
    stats.print_summary();

    if let Some(error) = stats.export_error {
        anyhow::bail!("Session export failed: {}", error);
    }

    info!("Beacon Scanner finished");
    Ok(())
}

fn default_session_name() -> String {
    Local::now().format("scan-%Y%m%d-%H%M%S").to_string()
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &ScanBlueprint, session_name: &str) {
    println!("\n=== Configuration Summary ===\n");
    println!("Allowlist ({}):", blueprint.allowlist.devices.len());
    for device in &blueprint.allowlist.devices {
        println!("  - {}", device);
    }

    println!("\nOrientation:");
    println!("  Strategy: {:?}", blueprint.orientation.strategy);
    println!("  Sensors: {:?}", blueprint.orientation.available_sensors);

    println!("\nReporter:");
    match (blueprint.reporter.enabled, &blueprint.reporter.endpoint) {
        (true, Some(endpoint)) => println!("  Endpoint: {}", endpoint),
        _ => println!("  Disabled"),
    }

    println!("\nExport:");
    println!(
        "  File: {}",
        blueprint
            .export
            .output_dir
            .join(format!("{session_name}.csv"))
            .display()
    );
    println!();
}
