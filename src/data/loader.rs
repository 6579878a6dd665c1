//! CSV ingestion of raw daily rows.
//!
//! Fields are kept as text here; numeric coercion and date parsing happen
//! when the historical series is built, so that malformed rows can be
//! dropped instead of failing the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ForecastError, Result};

/// One unparsed row from the price source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date", alias = "date", default)]
    pub date: Option<String>,
    #[serde(rename = "Open", alias = "open", default)]
    pub open: Option<String>,
    #[serde(rename = "High", alias = "high", default)]
    pub high: Option<String>,
    #[serde(rename = "Low", alias = "low", default)]
    pub low: Option<String>,
    #[serde(rename = "Close", alias = "close", default)]
    pub close: Option<String>,
    #[serde(rename = "Volume", alias = "volume", default)]
    pub volume: Option<String>,
}

impl RawRow {
    pub fn new(date: &str, open: &str, high: &str, low: &str, close: &str, volume: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            open: Some(open.to_string()),
            high: Some(high.to_string()),
            low: Some(low.to_string()),
            close: Some(close.to_string()),
            volume: Some(volume.to_string()),
        }
    }
}

pub fn load_raw_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ForecastError::DataLoad(format!("failed to open {}: {}", path.display(), e))
    })?;
    let rows = read_raw_rows(file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Read raw price rows");
    Ok(rows)
}

/// Read rows from any CSV source with a header line. Rows whose shape the
/// CSV reader itself rejects are skipped, like any other malformed row.
pub fn read_raw_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Surface a missing or unreadable header as a hard failure.
    reader.headers()?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<RawRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped unreadable CSV records");
    }
    Ok(rows)
}
