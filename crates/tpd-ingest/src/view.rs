//! The ViewDefinition boundary.
//!
//! ViewDefinition documents are opaque here: this crate loads them, hands
//! them to an external SQL-on-FHIR runner together with a resource bundle,
//! and takes tabular row objects back. Evaluating the view language is
//! never this crate's job.
//!
//! Two entry paths produce the same row shape:
//! - [`CommandViewRunner`] pipes `{view, bundle}` to a configured
//!   executable and reads a JSON row array from its stdout.
//! - [`read_view_rows`] loads rows that a runner already produced.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value, json};
use tracing::debug;

/// A tabular row produced by a view runner.
pub type ViewRow = Map<String, Value>;

/// External evaluator seam for SQL-on-FHIR ViewDefinitions.
pub trait ViewRunner {
    /// Project the bundle's resources through the view, returning one
    /// object per output row.
    fn run(&self, view: &Value, bundle: &Value) -> Result<Vec<ViewRow>>;
}

/// Runs a view through an external executable.
///
/// The runner receives `{"view": ..., "bundle": ...}` on stdin and must
/// print a JSON array of row objects on stdout.
#[derive(Debug, Clone)]
pub struct CommandViewRunner {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandViewRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments passed before the piped request.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl ViewRunner for CommandViewRunner {
    fn run(&self, view: &Value, bundle: &Value) -> Result<Vec<ViewRow>> {
        let request = json!({ "view": view, "bundle": bundle });
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn view runner {}", self.program.display()))?;
        // Close stdin once the request is written so the child sees EOF.
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| anyhow!("view runner stdin unavailable"))?;
            let payload = serde_json::to_vec(&request).context("encode runner request")?;
            stdin.write_all(&payload).context("write runner request")?;
        }
        let output = child
            .wait_with_output()
            .with_context(|| format!("wait for view runner {}", self.program.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "view runner {} failed ({}): {}",
                self.program.display(),
                output.status,
                stderr.trim()
            );
        }
        let rows: Value =
            serde_json::from_slice(&output.stdout).context("parse view runner output")?;
        rows_from_value(rows)
    }
}

/// Load a JSON document without interpreting it.
pub fn load_json_document(path: &Path) -> Result<Value> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

/// Load a ViewDefinition JSON document without interpreting it.
pub fn load_view_definition(path: &Path) -> Result<Value> {
    load_json_document(path)
}

/// Number of resource entries in a bundle document; zero when the entry
/// array is absent.
pub fn bundle_entry_count(bundle: &Value) -> usize {
    bundle
        .get("entry")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Wrap loose resources in a collection bundle for the runner.
pub fn bundle_resources(resources: &[Value]) -> Value {
    let entries: Vec<Value> = resources
        .iter()
        .map(|resource| json!({ "resource": resource }))
        .collect();
    json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": entries,
    })
}

/// Load pre-run view rows from a JSON file.
///
/// Accepts a bare array of row objects, or an object with a `rows` array
/// (the envelope some runners emit).
pub fn read_view_rows(path: &Path) -> Result<Vec<ViewRow>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse {}", path.display()))?;
    let rows = match value {
        Value::Object(mut envelope) => envelope
            .remove("rows")
            .ok_or_else(|| anyhow!("{}: expected a row array or a rows envelope", path.display()))?,
        other => other,
    };
    let rows = rows_from_value(rows)
        .with_context(|| format!("{}: malformed row set", path.display()))?;
    debug!(path = %path.display(), row_count = rows.len(), "view rows loaded");
    Ok(rows)
}

fn rows_from_value(value: Value) -> Result<Vec<ViewRow>> {
    let Value::Array(items) = value else {
        bail!("expected a JSON array of rows");
    };
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(row) => rows.push(row),
            other => bail!("row {index} is not an object: {other}"),
        }
    }
    Ok(rows)
}
