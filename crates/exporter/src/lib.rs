//! # Exporter
//!
//! Serializes a frozen session to CSV and writes it to disk.
//!
//! ```text
//! No.,TimeStamp,MAC Address,RSSI,Direction,Azimuth
//! 1,12:00:01,60:98:66:32:98:58,-61,N,10
//! ```
//!
//! Records taken without a heading leave `Direction` and `Azimuth` empty.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use contracts::{ContractError, CorrelatedRecord};
use tracing::{debug, error, info, instrument};

/// Column header, in output order
pub const HEADER: [&str; 6] = ["No.", "TimeStamp", "MAC Address", "RSSI", "Direction", "Azimuth"];

/// Result of writing a session to disk
#[derive(Debug, Clone)]
pub struct SessionFile {
    pub path: PathBuf,
    /// Exact bytes written
    pub document: String,
}

/// CSV session exporter
pub struct CsvExporter;

impl CsvExporter {
    /// Render records as a CSV document, `\n` terminated, in log order
    ///
    /// Deterministic: the same records always give the same text.
    pub fn export(records: &[CorrelatedRecord]) -> Result<String, ContractError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(HEADER).map_err(render_error)?;
        for record in records {
            writer.write_record(row(record)).map_err(render_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ContractError::export("<memory>", e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ContractError::export("<memory>", e.to_string()))
    }

    /// Write `<dir>/<name>.csv` atomically
    ///
    /// The document goes to a temporary file in `dir` that is renamed into
    /// place, so a failure never leaves a partial file behind. `dir` is
    /// created if missing.
    #[instrument(name = "csv_write_session", skip(records), fields(records = records.len()))]
    pub fn write_session(
        dir: &Path,
        name: &str,
        records: &[CorrelatedRecord],
    ) -> Result<SessionFile, ContractError> {
        validate_session_name(name)?;

        let document = Self::export(records)?;
        let file_name = if name.ends_with(".csv") {
            name.to_string()
        } else {
            format!("{name}.csv")
        };
        let path = dir.join(file_name);

        write_atomic(dir, &path, document.as_bytes()).map_err(|e| {
            error!(path = %path.display(), error = %e, "Session export failed");
            ContractError::export(name, e.to_string())
        })?;

        observability::record_session_exported(records.len(), document.len());
        info!(path = %path.display(), records = records.len(), "Session exported");
        Ok(SessionFile { path, document })
    }
}

fn row(record: &CorrelatedRecord) -> [String; 6] {
    [
        record.seq.to_string(),
        record.time_of_day.clone(),
        record.device_id.to_string(),
        record.rssi.to_string(),
        record.direction.map(|d| d.label().to_string()).unwrap_or_default(),
        record.azimuth.map(|a| a.to_string()).unwrap_or_default(),
    ]
}

fn render_error(e: csv::Error) -> ContractError {
    ContractError::export("<memory>", e.to_string())
}

/// A session name must be a plain file name
pub fn validate_session_name(name: &str) -> Result<(), ContractError> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(ContractError::export(
            name,
            "session name must be a non-blank file name without path separators",
        ));
    }
    Ok(())
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "File persisted");
    Ok(())
}
