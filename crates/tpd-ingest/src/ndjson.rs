//! Newline-delimited JSON resource loading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// Read one resource per line from an NDJSON file.
///
/// Blank lines are skipped. Each remaining line must be a complete JSON
/// document; a malformed line fails the load with its line number.
pub fn read_ndjson_resources(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut resources = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let resource: Value = serde_json::from_str(trimmed)
            .with_context(|| format!("{}:{}: malformed JSON", path.display(), index + 1))?;
        resources.push(resource);
    }
    debug!(
        path = %path.display(),
        resource_count = resources.len(),
        "ndjson loaded"
    );
    Ok(resources)
}
