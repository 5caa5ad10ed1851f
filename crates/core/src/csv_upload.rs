//! CSV bulk-import files: loading and a header preflight.
//!
//! Row contents are validated by the server, which reports per-row failures
//! in the import summary. The preflight only catches files that could never
//! import anything.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, RollcallError};

/// Columns every import file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["firstName", "lastName", "rollNumber", "grade", "division"];

/// A CSV file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What the preflight learned about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPreflight {
    pub columns: Vec<String>,
    pub row_count: usize,
}

impl CsvUpload {
    pub fn from_bytes(file_name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Read an upload from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "students.csv".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Check the header and count data rows.
pub fn preflight(upload: &CsvUpload) -> Result<CsvPreflight> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(upload.bytes.as_slice());

    let headers = rdr
        .headers()
        .map_err(|e| RollcallError::Csv(format!("{}: unreadable header: {e}", upload.file_name)))?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .filter(|h| !h.is_empty())
        .collect();

    if columns.is_empty() {
        return Err(RollcallError::Csv(format!(
            "{}: file has no header row",
            upload.file_name
        )));
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|req| !columns.iter().any(|c| c == req))
        .collect();
    if !missing.is_empty() {
        return Err(RollcallError::Csv(format!(
            "{}: missing required columns: {}",
            upload.file_name,
            missing.join(", ")
        )));
    }

    // Rows stay raw bytes: a Latin-1 export is still the server's to judge.
    let mut row_count = 0;
    for record in rdr.byte_records() {
        let record = record
            .map_err(|e| RollcallError::Csv(format!("{}: {e}", upload.file_name)))?;
        if record.iter().any(|field| !field.is_empty()) {
            row_count += 1;
        }
    }

    if row_count == 0 {
        return Err(RollcallError::Csv(format!(
            "{}: file has no student rows",
            upload.file_name
        )));
    }

    debug!(file = %upload.file_name, rows = row_count, "CSV preflight passed");
    Ok(CsvPreflight { columns, row_count })
}
