//! Flat CSV export of recorded entries, and reading those exports back.
//!
//! The file layout is fixed: a `date,metric,value` header followed by one row
//! per entry in collection order.

use crate::{Entry, Error, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// Header row written at the top of every export
pub const CSV_HEADER: [&str; 3] = ["date", "metric", "value"];

/// CSV row format for reading exported entries
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    metric: String,
    value: String,
}

impl TryFrom<CsvRow> for Entry {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        Entry::parse(&row.date, &row.metric, row.value)
    }
}

/// Write `entries` to `path`, replacing any existing file
///
/// The header is written even when there are no entries. The file is flushed
/// and synced before returning; the handle is closed on every path.
pub fn export_csv(entries: &[Entry], path: &Path) -> Result<()> {
    let file = File::create(path)?;

    // Header is written by hand so empty exports still carry it
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(CSV_HEADER)?;

    for entry in entries {
        writer.serialize(entry)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::debug!("Exported {} entries to {:?}", entries.len(), path);
    Ok(())
}

/// Read an export produced by [`export_csv`]
///
/// Every row is validated like [`crate::add_entry`]; the first bad row fails
/// the whole read with its line number.
pub fn load_csv(path: &Path) -> Result<Vec<Entry>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.iter().ne(CSV_HEADER) {
        return Err(Error::invalid(format!(
            "{:?} does not start with a date,metric,value header",
            path
        )));
    }

    let mut entries = Vec::new();
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let row = result?;
        let entry = Entry::try_from(row)
            .map_err(|e| Error::invalid(format!("{:?} line {}: {}", path, line, e)))?;
        entries.push(entry);
    }

    tracing::debug!("Loaded {} entries from {:?}", entries.len(), path);
    Ok(entries)
}
