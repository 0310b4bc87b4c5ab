use std::time::Instant;

use anyhow::{Result, bail};
use tracing::{info, info_span};

use tpd_analyze::run_analysis;
use tpd_ingest::CommandViewRunner;
use tpd_model::{AnalysisOptions, PendingPolicy, ReferencePoint};

use tpd_cli::pipeline::{
    ProjectionResult, export, project_bundles, project_fhir, project_prerun,
};
use tpd_cli::summary::{
    bucket_table, print_banner, print_distribution, print_exports, print_projection, print_summary,
};

use crate::cli::{AnalyzeArgs, PolicyArg, ReferenceArg};

pub fn run_buckets() -> Result<()> {
    println!("{}", bucket_table());
    Ok(())
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let span = info_span!("analyze_command");
    let _guard = span.enter();
    let start = Instant::now();

    print_banner();
    let projection = projection_stage(args)?;
    print_projection(&projection);

    let options = analysis_options(args);
    let analysis = run_analysis(
        projection.encounters.clone(),
        projection.observations.clone(),
        &options,
    )?;
    print_summary(&analysis.summary, &options);
    print_distribution(&analysis.distribution);

    let exports = export(&args.output_dir, &analysis, !args.no_chart)?;
    print_exports(&exports);

    info!(
        duration_ms = start.elapsed().as_millis(),
        "analysis finished"
    );
    Ok(())
}

/// Pick the projection path from the CLI flags.
///
/// Every entry point is first-class: NDJSON resources plus an external
/// runner, pre-assembled bundles plus the runner, or pre-run row files.
/// Mixing or omitting them is a usage error.
fn projection_stage(args: &AnalyzeArgs) -> Result<ProjectionResult> {
    if args.encounter_bundle.is_some() != args.observation_bundle.is_some() {
        bail!("--encounter-bundle and --observation-bundle must be given together");
    }
    if args.encounter_rows.is_some() != args.observation_rows.is_some() {
        bail!("--encounter-rows and --observation-rows must be given together");
    }
    let bundles = args
        .encounter_bundle
        .as_ref()
        .zip(args.observation_bundle.as_ref());
    let rows = args
        .encounter_rows
        .as_ref()
        .zip(args.observation_rows.as_ref());

    match (&args.fhir_dir, bundles, rows) {
        (Some(fhir_dir), None, None) => {
            let runner = command_runner(args)?;
            project_fhir(
                fhir_dir,
                &args.encounter_view,
                &args.observation_view,
                &runner,
            )
        }
        (None, Some((encounter_bundle, observation_bundle)), None) => {
            let runner = command_runner(args)?;
            project_bundles(
                encounter_bundle,
                observation_bundle,
                &args.encounter_view,
                &args.observation_view,
                &runner,
            )
        }
        (None, None, Some((encounter_rows, observation_rows))) => {
            project_prerun(encounter_rows, observation_rows)
        }
        _ => bail!(
            "provide exactly one input: --fhir-dir with --runner, \
             --encounter-bundle/--observation-bundle with --runner, \
             or --encounter-rows/--observation-rows"
        ),
    }
}

fn command_runner(args: &AnalyzeArgs) -> Result<CommandViewRunner> {
    let Some(program) = &args.runner else {
        bail!("this input path requires --runner (the external view evaluator)");
    };
    Ok(CommandViewRunner::new(program).with_args(args.runner_args.clone()))
}

fn analysis_options(args: &AnalyzeArgs) -> AnalysisOptions {
    let policy = match args.policy {
        PolicyArg::Delay => PendingPolicy::DelayBased,
        PolicyArg::Status => PendingPolicy::StatusBased,
    };
    let reference = match args.reference {
        ReferenceArg::Start => ReferencePoint::EncounterStart,
        ReferenceArg::Discharge => ReferencePoint::Discharge,
    };
    let class = if args.all_encounters {
        None
    } else {
        Some(args.encounter_class.clone())
    };
    AnalysisOptions::new()
        .with_policy(policy)
        .with_reference(reference)
        .with_encounter_class(class)
}
