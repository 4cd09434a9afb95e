//! Effective configuration: file (or defaults) plus command-line overrides.

use std::path::Path;

use config_loader::ConfigLoader;
use contracts::ScanBlueprint;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};

/// Load `path`, or the built-in defaults when no path is given
pub fn load_blueprint(path: Option<&Path>) -> Result<ScanBlueprint> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            Ok(ConfigLoader::load_from_path(path)?)
        }
        None => {
            info!("No configuration file given, using defaults");
            Ok(ScanBlueprint::default())
        }
    }
}

/// Apply `run` overrides and re-validate the result
///
/// An endpoint override turns remote reporting on.
pub fn apply_overrides(blueprint: &mut ScanBlueprint, args: &RunArgs) -> Result<()> {
    if let Some(ref endpoint) = args.endpoint {
        info!(endpoint = %endpoint, "Overriding collector endpoint from CLI");
        blueprint.reporter.endpoint = Some(endpoint.clone());
        blueprint.reporter.enabled = true;
    }
    if let Some(ref device_id) = args.device_id {
        info!(device_id = %device_id, "Overriding local device id from CLI");
        blueprint.reporter.local_device_id = device_id.clone();
    }
    if let Some(ref output_dir) = args.output_dir {
        info!(output_dir = %output_dir.display(), "Overriding export directory from CLI");
        blueprint.export.output_dir = output_dir.clone();
    }

    ConfigLoader::validate(blueprint)?;
    Ok(())
}
