//! Analysis pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Project**: obtain the two tabular projections by running
//!    ViewDefinitions through the external runner (over NDJSON resources
//!    or pre-assembled bundles) or by loading pre-run rows
//! 2. **Analyze**: join, classify, aggregate, bucket (tpd-analyze)
//! 3. **Export**: write the CSV tables and the chart HTML
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use tpd_analyze::Analysis;
use tpd_ingest::{
    ViewRunner, bundle_entry_count, bundle_resources, load_json_document, load_view_definition,
    read_ndjson_resources, read_view_rows, rows_to_frame,
};
use tpd_model::columns::{encounter, observation};
use tpd_report::{
    CHART_HTML, ENCOUNTERS_CSV, OBSERVATIONS_CSV, pending_by_day_chart, write_chart_html,
    write_table,
};

/// Fixed NDJSON file name for encounter resources.
pub const ENCOUNTER_NDJSON: &str = "Encounter.ndjson";
/// Fixed NDJSON file name for observation resources.
pub const OBSERVATION_NDJSON: &str = "Observation.ndjson";

/// Result of the projection stage.
#[derive(Debug)]
pub struct ProjectionResult {
    /// Encounter projection.
    pub encounters: DataFrame,
    /// Lab observation projection.
    pub observations: DataFrame,
    /// Source resources read for the encounter table.
    pub encounter_resources: usize,
    /// Source resources read for the observation table.
    pub observation_resources: usize,
}

/// Project NDJSON resources through ViewDefinitions via the external runner.
pub fn project_fhir(
    fhir_dir: &Path,
    encounter_view: &Path,
    observation_view: &Path,
    runner: &dyn ViewRunner,
) -> Result<ProjectionResult> {
    let span = info_span!("project", source = "fhir", fhir_dir = %fhir_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let encounters = read_ndjson_resources(&fhir_dir.join(ENCOUNTER_NDJSON))
        .context("load encounter resources")?;
    let observations = read_ndjson_resources(&fhir_dir.join(OBSERVATION_NDJSON))
        .context("load observation resources")?;

    let enc_view = load_view_definition(encounter_view).context("load encounter view")?;
    let obs_view = load_view_definition(observation_view).context("load observation view")?;

    let enc_rows = runner
        .run(&enc_view, &bundle_resources(&encounters))
        .context("run encounter view")?;
    let obs_rows = runner
        .run(&obs_view, &bundle_resources(&observations))
        .context("run observation view")?;

    let result = ProjectionResult {
        encounters: rows_to_frame(&enc_rows, &encounter::PROJECTED)?,
        observations: rows_to_frame(&obs_rows, &observation::PROJECTED)?,
        encounter_resources: encounters.len(),
        observation_resources: observations.len(),
    };
    info!(
        encounter_resources = result.encounter_resources,
        observation_resources = result.observation_resources,
        encounter_rows = result.encounters.height(),
        observation_rows = result.observations.height(),
        duration_ms = start.elapsed().as_millis(),
        "projection complete"
    );
    Ok(result)
}

/// Project already-assembled bundle documents through the external runner.
pub fn project_bundles(
    encounter_bundle: &Path,
    observation_bundle: &Path,
    encounter_view: &Path,
    observation_view: &Path,
    runner: &dyn ViewRunner,
) -> Result<ProjectionResult> {
    let span = info_span!("project", source = "bundles");
    let _guard = span.enter();
    let start = Instant::now();

    let enc_bundle = load_json_document(encounter_bundle).context("load encounter bundle")?;
    let obs_bundle = load_json_document(observation_bundle).context("load observation bundle")?;
    let enc_view = load_view_definition(encounter_view).context("load encounter view")?;
    let obs_view = load_view_definition(observation_view).context("load observation view")?;

    let enc_rows = runner
        .run(&enc_view, &enc_bundle)
        .context("run encounter view")?;
    let obs_rows = runner
        .run(&obs_view, &obs_bundle)
        .context("run observation view")?;

    let result = ProjectionResult {
        encounters: rows_to_frame(&enc_rows, &encounter::PROJECTED)?,
        observations: rows_to_frame(&obs_rows, &observation::PROJECTED)?,
        encounter_resources: bundle_entry_count(&enc_bundle),
        observation_resources: bundle_entry_count(&obs_bundle),
    };
    info!(
        encounter_resources = result.encounter_resources,
        observation_resources = result.observation_resources,
        encounter_rows = result.encounters.height(),
        observation_rows = result.observations.height(),
        duration_ms = start.elapsed().as_millis(),
        "projection complete"
    );
    Ok(result)
}

/// Load pre-run view rows directly, bypassing the runner.
pub fn project_prerun(encounter_rows: &Path, observation_rows: &Path) -> Result<ProjectionResult> {
    let span = info_span!("project", source = "prerun");
    let _guard = span.enter();
    let start = Instant::now();

    let enc_rows = read_view_rows(encounter_rows).context("load encounter rows")?;
    let obs_rows = read_view_rows(observation_rows).context("load observation rows")?;

    let result = ProjectionResult {
        encounter_resources: enc_rows.len(),
        observation_resources: obs_rows.len(),
        encounters: rows_to_frame(&enc_rows, &encounter::PROJECTED)?,
        observations: rows_to_frame(&obs_rows, &observation::PROJECTED)?,
    };
    info!(
        encounter_rows = result.encounters.height(),
        observation_rows = result.observations.height(),
        duration_ms = start.elapsed().as_millis(),
        "projection complete"
    );
    Ok(result)
}

/// Result of the export stage.
#[derive(Debug)]
pub struct ExportResult {
    pub encounters_csv: PathBuf,
    pub observations_csv: PathBuf,
    /// Written only when a chart was requested and the distribution is
    /// non-empty.
    pub chart: Option<PathBuf>,
}

/// Chart title matching the reference figure.
pub const CHART_TITLE: &str = "Results after Discharge";

/// Write the CSV tables and, when requested, the chart HTML.
pub fn export(output_dir: &Path, analysis: &Analysis, write_chart: bool) -> Result<ExportResult> {
    let span = info_span!("export", output_dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let encounters_csv = output_dir.join(ENCOUNTERS_CSV);
    write_table(&encounters_csv, &analysis.encounters)?;
    let observations_csv = output_dir.join(OBSERVATIONS_CSV);
    write_table(&observations_csv, &analysis.observations)?;

    let chart = if write_chart && !analysis.distribution.is_empty() {
        let spec = pending_by_day_chart(&analysis.distribution, CHART_TITLE);
        let path = output_dir.join(CHART_HTML);
        write_chart_html(&path, &spec)?;
        Some(path)
    } else {
        None
    };

    info!(
        encounters_csv = %encounters_csv.display(),
        observations_csv = %observations_csv.display(),
        chart = chart.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "export complete"
    );
    Ok(ExportResult {
        encounters_csv,
        observations_csv,
        chart,
    })
}
