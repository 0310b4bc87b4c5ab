//! Tests for console report formatting.

use serde_json::{Value, json};

use tpd_analyze::run_analysis;
use tpd_cli::summary::distribution_lines;
use tpd_ingest::{ViewRow, rows_to_frame};
use tpd_model::columns::{encounter, observation};
use tpd_model::{AnalysisOptions, DelayBucket};

fn rows(values: Vec<Value>) -> Vec<ViewRow> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            other => panic!("expected object row, got {other}"),
        })
        .collect()
}

fn sample_distribution() -> tpd_analyze::Distribution {
    let encounters = rows_to_frame(
        &rows(vec![json!({
            "encounter_id": "E1",
            "encounter_class": "IMP",
            "encounter_type": "Inpatient stay",
            "start_time": "2025-03-01T00:00:00Z",
            "end_time": "2025-03-03T00:00:00Z",
        })]),
        &encounter::PROJECTED,
    )
    .unwrap();
    let observations = rows_to_frame(
        &rows(vec![
            json!({
                "observation_id": "O1",
                "encounter_id": "E1",
                "lab_code": "600-7",
                "lab_display": "Blood culture",
                "issued_time": "2025-03-01T12:00:00Z",
                "status": "preliminary",
            }),
            json!({
                "observation_id": "O2",
                "encounter_id": "E1",
                "lab_code": "718-7",
                "lab_display": "Hemoglobin",
                "issued_time": "2025-03-02T12:00:00Z",
                "status": "final",
            }),
        ]),
        &observation::PROJECTED,
    )
    .unwrap();
    run_analysis(encounters, observations, &AnalysisOptions::default())
        .unwrap()
        .distribution
}

#[test]
fn bucket_axis_order_is_fixed() {
    let labels: Vec<&str> = DelayBucket::ALL.iter().map(|bucket| bucket.label()).collect();
    insta::assert_snapshot!(labels.join(" "), @"0-1 1-2 2-3 3-4 4-6 6-10 10+");
}

#[test]
fn distribution_lines_cover_every_bucket_in_order() {
    let distribution = sample_distribution();
    let lines = distribution_lines(&distribution);
    assert_eq!(lines.len(), 7);
    // Culture at 0.5 days, other at 1.5 days: 50% in each of the first two bins.
    insta::assert_snapshot!(
        lines[0].as_str(),
        @"0-1  :    1 ( 50.0%) - Cultures: 1, Other: 0"
    );
    insta::assert_snapshot!(
        lines[1].as_str(),
        @"1-2  :    1 ( 50.0%) - Cultures: 0, Other: 1"
    );
    insta::assert_snapshot!(
        lines[6].as_str(),
        @"10+  :    0 (  0.0%) - Cultures: 0, Other: 0"
    );
}

#[test]
fn empty_distribution_reports_zero_percent() {
    let encounters = rows_to_frame(&[], &encounter::PROJECTED).unwrap();
    let observations = rows_to_frame(&[], &observation::PROJECTED).unwrap();
    let analysis = run_analysis(encounters, observations, &AnalysisOptions::default()).unwrap();
    let lines = distribution_lines(&analysis.distribution);
    assert_eq!(lines.len(), 7);
    for line in &lines {
        assert!(line.contains("   0 (  0.0%)"), "{line}");
    }
}
