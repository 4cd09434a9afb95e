//! Configuration validation
//!
//! Rules:
//! - field rules declared on the blueprint (`validator` derive)
//! - allowlist entries non-blank and unique
//! - an enabled reporter has an http(s) endpoint
//! - available sensors listed once

use std::collections::HashSet;

use contracts::{ContractError, ScanBlueprint};
use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a ScanBlueprint
///
/// Returns the first error encountered.
pub fn validate(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_allowlist(blueprint)?;
    validate_reporter(blueprint)?;
    validate_sensors(blueprint)?;
    Ok(())
}

fn validate_fields(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_violation(&errors, "")
                .unwrap_or_else(|| (String::from("<root>"), errors.to_string()));
            Err(ContractError::config_validation(field, message))
        }
    }
}

/// Depth-first, name-ordered so the reported field is stable
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (name, kind) in fields {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                if let Some(found) = first_violation(nested, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    if let Some(found) = first_violation(nested, &format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

fn validate_allowlist(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, device) in blueprint.allowlist.devices.iter().enumerate() {
        if device.trim().is_empty() || device.trim() != device {
            return Err(ContractError::config_validation(
                format!("allowlist.devices[{idx}]"),
                format!("device id '{device}' is blank or has surrounding whitespace"),
            ));
        }
        if !seen.insert(device.as_str()) {
            return Err(ContractError::config_validation(
                format!("allowlist.devices[{idx}]"),
                format!("duplicate device id '{device}'"),
            ));
        }
    }
    Ok(())
}

fn validate_reporter(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let reporter = &blueprint.reporter;
    if !reporter.enabled {
        return Ok(());
    }

    let Some(endpoint) = reporter.endpoint.as_deref() else {
        return Err(ContractError::config_validation(
            "reporter.endpoint",
            "endpoint is required when reporting is enabled",
        ));
    };

    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ContractError::config_validation(
            "reporter.endpoint",
            format!("endpoint '{endpoint}' must use http or https"),
        ));
    }

    Ok(())
}

fn validate_sensors(blueprint: &ScanBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for kind in &blueprint.orientation.available_sensors {
        if !seen.insert(kind) {
            return Err(ContractError::config_validation(
                "orientation.available_sensors",
                format!("sensor '{kind}' listed more than once"),
            ));
        }
    }
    Ok(())
}
