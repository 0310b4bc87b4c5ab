//! Integration tests for the staged pipeline.

use std::fs;
use std::path::Path;

use tpd_analyze::run_analysis;
use tpd_cli::pipeline::{
    ENCOUNTER_NDJSON, OBSERVATION_NDJSON, export, project_bundles, project_fhir, project_prerun,
};
use tpd_model::AnalysisOptions;
use tpd_model::columns::encounter;
use tpd_report::read_table;

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

fn prerun_fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let encounters = dir.join("encounters.json");
    write(
        &encounters,
        r#"[
            {"encounter_id": "E1", "encounter_class": "IMP", "encounter_type": "Inpatient stay",
             "start_time": "2025-03-01T00:00:00Z", "end_time": "2025-03-03T00:00:00Z"},
            {"encounter_id": "E2", "encounter_class": "AMB", "encounter_type": "Ambulatory",
             "start_time": "2025-03-01T00:00:00Z", "end_time": "2025-03-01T04:00:00Z"}
        ]"#,
    );
    let observations = dir.join("observations.json");
    write(
        &observations,
        r#"[
            {"observation_id": "O1", "encounter_id": "Encounter/E1", "lab_code": "600-7",
             "lab_display": "Blood culture", "issued_time": "2025-03-02T12:00:00Z",
             "status": "preliminary"},
            {"observation_id": "O2", "encounter_id": "E1", "lab_code": "718-7",
             "lab_display": "Hemoglobin", "issued_time": "2025-03-01T06:00:00Z",
             "status": "final"}
        ]"#,
    );
    (encounters, observations)
}

#[test]
fn prerun_path_produces_reports() {
    let dir = tempfile::tempdir().unwrap();
    let (encounters, observations) = prerun_fixture(dir.path());

    let projection = project_prerun(&encounters, &observations).unwrap();
    assert_eq!(projection.encounters.height(), 2);
    assert_eq!(projection.observations.height(), 2);

    let analysis = run_analysis(
        projection.encounters,
        projection.observations,
        &AnalysisOptions::default(),
    )
    .unwrap();
    assert_eq!(analysis.summary.total_pending, 2);
    assert_eq!(analysis.summary.encounters_with_pending, 1);

    let output_dir = dir.path().join("output");
    let exports = export(&output_dir, &analysis, true).unwrap();
    assert!(exports.encounters_csv.exists());
    assert!(exports.observations_csv.exists());
    let chart = exports.chart.expect("chart written for non-empty distribution");
    assert!(chart.exists());

    let reloaded = read_table(&exports.encounters_csv).unwrap();
    assert_eq!(reloaded.height(), 2);
    let names: Vec<String> = reloaded
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, encounter::EXPORTED);
}

#[test]
fn chart_is_skipped_when_disabled_or_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (encounters, observations) = prerun_fixture(dir.path());
    let projection = project_prerun(&encounters, &observations).unwrap();
    let analysis = run_analysis(
        projection.encounters,
        projection.observations,
        &AnalysisOptions::default(),
    )
    .unwrap();

    let no_chart_dir = dir.path().join("no-chart");
    let exports = export(&no_chart_dir, &analysis, false).unwrap();
    assert!(exports.chart.is_none());
    assert!(exports.encounters_csv.exists());
}

#[test]
fn empty_prerun_inputs_still_export() {
    let dir = tempfile::tempdir().unwrap();
    let encounters = dir.path().join("encounters.json");
    write(&encounters, "[]");
    let observations = dir.path().join("observations.json");
    write(&observations, "[]");

    let projection = project_prerun(&encounters, &observations).unwrap();
    let analysis = run_analysis(
        projection.encounters,
        projection.observations,
        &AnalysisOptions::default(),
    )
    .unwrap();
    assert_eq!(analysis.summary.pending_rate, 0.0);

    let output_dir = dir.path().join("output");
    let exports = export(&output_dir, &analysis, true).unwrap();
    // Empty distribution: no chart file, but both tables exist with headers.
    assert!(exports.chart.is_none());
    let reloaded = read_table(&exports.encounters_csv).unwrap();
    assert_eq!(reloaded.height(), 0);
}

#[test]
fn bundle_path_feeds_documents_to_the_runner() {
    use serde_json::{Value, json};
    use tpd_ingest::{ViewRow, ViewRunner};

    /// Answers encounter requests with one row and everything else with none.
    struct EncounterOnlyRunner;

    impl ViewRunner for EncounterOnlyRunner {
        fn run(&self, view: &Value, _bundle: &Value) -> anyhow::Result<Vec<ViewRow>> {
            if view["resource"] == "Encounter" {
                let row = json!({
                    "encounter_id": "E1",
                    "encounter_class": "IMP",
                    "start_time": "2025-03-01T00:00:00Z",
                    "end_time": "2025-03-02T00:00:00Z",
                });
                match row {
                    Value::Object(map) => Ok(vec![map]),
                    _ => unreachable!(),
                }
            } else {
                Ok(Vec::new())
            }
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let enc_bundle = dir.path().join("encounters.bundle.json");
    write(
        &enc_bundle,
        r#"{"resourceType": "Bundle", "type": "collection",
            "entry": [{"resource": {"resourceType": "Encounter", "id": "E1"}}]}"#,
    );
    let obs_bundle = dir.path().join("observations.bundle.json");
    write(
        &obs_bundle,
        r#"{"resourceType": "Bundle", "type": "collection", "entry": []}"#,
    );
    let enc_view = dir.path().join("EncounterView.json");
    write(&enc_view, r#"{"resourceType": "ViewDefinition", "resource": "Encounter"}"#);
    let obs_view = dir.path().join("LabObservationView.json");
    write(&obs_view, r#"{"resourceType": "ViewDefinition", "resource": "Observation"}"#);

    let projection =
        project_bundles(&enc_bundle, &obs_bundle, &enc_view, &obs_view, &EncounterOnlyRunner)
            .unwrap();
    assert_eq!(projection.encounter_resources, 1);
    assert_eq!(projection.observation_resources, 0);
    assert_eq!(projection.encounters.height(), 1);
    assert_eq!(projection.observations.height(), 0);
}

#[cfg(unix)]
#[test]
fn fhir_path_runs_views_through_the_external_runner() {
    use tpd_ingest::{CommandViewRunner, ViewRunner};

    let dir = tempfile::tempdir().unwrap();
    let fhir_dir = dir.path().join("fhir");
    fs::create_dir_all(&fhir_dir).unwrap();
    write(
        &fhir_dir.join(ENCOUNTER_NDJSON),
        "{\"resourceType\":\"Encounter\",\"id\":\"E1\"}\n",
    );
    write(
        &fhir_dir.join(OBSERVATION_NDJSON),
        "{\"resourceType\":\"Observation\",\"id\":\"O1\"}\n",
    );
    let enc_view = dir.path().join("EncounterView.json");
    write(&enc_view, "{\"resourceType\":\"ViewDefinition\",\"resource\":\"Encounter\"}");
    let obs_view = dir.path().join("LabObservationView.json");
    write(&obs_view, "{\"resourceType\":\"ViewDefinition\",\"resource\":\"Observation\"}");

    // The stand-in evaluator answers every request with one encounter row.
    let runner = CommandViewRunner::new("/bin/sh").with_args(vec![
        "-c".to_string(),
        "cat > /dev/null; printf '[{\"encounter_id\":\"E1\",\"encounter_class\":\"IMP\",\
         \"start_time\":\"2025-03-01T00:00:00Z\",\"end_time\":\"2025-03-02T00:00:00Z\"}]'"
            .to_string(),
    ]);
    let _: &dyn ViewRunner = &runner;

    let projection = project_fhir(&fhir_dir, &enc_view, &obs_view, &runner).unwrap();
    assert_eq!(projection.encounter_resources, 1);
    assert_eq!(projection.observation_resources, 1);
    assert_eq!(projection.encounters.height(), 1);
    assert_eq!(projection.observations.height(), 1);
}
