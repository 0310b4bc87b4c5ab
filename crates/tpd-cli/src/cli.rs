//! CLI argument definitions for the pending-lab analysis tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tpd",
    version,
    about = "Tests Pending at Discharge - pending-lab analysis and reporting",
    long_about = "Compute counts and rates of laboratory tests still pending at\n\
                  hospital discharge from SQL-on-FHIR view projections, and write\n\
                  CSV tables plus a distribution chart."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the analysis and write CSV tables plus the chart.
    Analyze(AnalyzeArgs),

    /// List the delay buckets used by the distribution.
    Buckets,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Directory with Encounter.ndjson and Observation.ndjson.
    ///
    /// Requires --runner; the resources are bundled and projected through
    /// the ViewDefinitions by the external runner.
    #[arg(long = "fhir-dir", value_name = "DIR")]
    pub fhir_dir: Option<PathBuf>,

    /// Encounter ViewDefinition document.
    #[arg(
        long = "encounter-view",
        value_name = "FILE",
        default_value = "EncounterView.json"
    )]
    pub encounter_view: PathBuf,

    /// Lab observation ViewDefinition document.
    #[arg(
        long = "observation-view",
        value_name = "FILE",
        default_value = "LabObservationView.json"
    )]
    pub observation_view: PathBuf,

    /// External SQL-on-FHIR runner executable.
    ///
    /// Receives {"view": ..., "bundle": ...} on stdin and must print a
    /// JSON array of row objects.
    #[arg(long = "runner", value_name = "PROGRAM")]
    pub runner: Option<PathBuf>,

    /// Extra argument passed to the runner (repeatable).
    #[arg(long = "runner-arg", value_name = "ARG")]
    pub runner_args: Vec<String>,

    /// Pre-assembled encounter bundle (JSON). Alternative to --fhir-dir;
    /// requires --runner and --observation-bundle.
    #[arg(long = "encounter-bundle", value_name = "FILE")]
    pub encounter_bundle: Option<PathBuf>,

    /// Pre-assembled observation bundle (JSON).
    #[arg(long = "observation-bundle", value_name = "FILE")]
    pub observation_bundle: Option<PathBuf>,

    /// Pre-run encounter view rows (JSON). Alternative to --fhir-dir.
    #[arg(long = "encounter-rows", value_name = "FILE")]
    pub encounter_rows: Option<PathBuf>,

    /// Pre-run lab observation view rows (JSON).
    #[arg(long = "observation-rows", value_name = "FILE")]
    pub observation_rows: Option<PathBuf>,

    /// Output directory for generated files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Pending classification policy.
    #[arg(long = "policy", value_enum, default_value = "delay")]
    pub policy: PolicyArg,

    /// Reference instant delays are measured from.
    #[arg(long = "reference", value_enum, default_value = "start")]
    pub reference: ReferenceArg,

    /// Encounter class code restricting the delay analysis.
    #[arg(long = "encounter-class", value_name = "CODE", default_value = "IMP")]
    pub encounter_class: String,

    /// Analyze every encounter regardless of class.
    #[arg(long = "all-encounters")]
    pub all_encounters: bool,

    /// Skip writing the HTML chart.
    #[arg(long = "no-chart")]
    pub no_chart: bool,
}

/// CLI pending policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Pending when issued after the reference instant.
    Delay,
    /// Pending when the result status is not final.
    Status,
}

/// CLI reference instant choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ReferenceArg {
    /// Measure delays from the encounter start.
    Start,
    /// Measure delays from the discharge boundary.
    Discharge,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
