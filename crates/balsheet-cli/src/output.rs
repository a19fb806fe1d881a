//! # CSV Output
//!
//! Serializes flattened ledger rows with the `csv` crate. The header row is
//! always written, even for an empty record set, so downstream loaders see a
//! stable column layout.
//!
//! Files are written to a temporary sibling of the destination and renamed
//! over it once the last row is flushed.

use std::io::Write;
use std::path::Path;

use balsheet_core::FlatRecord;
use tempfile::NamedTempFile;

use crate::error::PipelineError;

/// Column order of the tabular output.
pub const COLUMNS: [&str; 4] = ["path", "name", "value", "account_id"];

/// Write `records` as CSV to `writer`.
pub fn write_csv<W: Write>(records: &[FlatRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` as CSV to the file at `path`, replacing it if present.
///
/// On failure the destination is left as it was.
pub fn write_csv_file(records: &[FlatRecord], path: &Path) -> Result<(), PipelineError> {
    let output_error = |reason: String| {
        tracing::error!(path = %path.display(), %reason, "cannot write tabular output");
        PipelineError::Output {
            path: path.display().to_string(),
            reason,
        }
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| output_error(format!("cannot create file: {e}")))?;
    write_csv(records, temp.as_file_mut()).map_err(|e| output_error(e.to_string()))?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| output_error(format!("cannot replace file: {}", e.error)))?;

    tracing::info!(path = %path.display(), rows = records.len(), "wrote tabular output");
    Ok(())
}
