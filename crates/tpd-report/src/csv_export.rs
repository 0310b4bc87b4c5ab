//! CSV serialization of the output tables.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

/// Write a table to CSV with a header row.
///
/// Column order is whatever the frame carries; callers build frames with
/// the documented export order, so the file layout is stable run to run.
pub fn write_table(path: &Path, table: &DataFrame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = table.clone();
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut out)
        .with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), rows = table.height(), "table exported");
    Ok(())
}

/// Read an exported table back. All columns arrive as strings, matching
/// the export's round-trip guarantee modulo type stringification.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open {}", path.display()))?
        .finish()
        .with_context(|| format!("read {}", path.display()))
}
