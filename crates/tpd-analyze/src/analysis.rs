//! End-to-end analysis over the two projected tables.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use tpd_model::AnalysisOptions;

use crate::classify::classify;
use crate::distribution::Distribution;
use crate::join::join_delays;
use crate::normalize::{derive_discharge_date, filter_encounter_class, normalize_observation_refs};
use crate::summary::{SummaryStats, attach_pending_counts, summarize};

/// Everything one run derives from the projections.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Full encounter set with discharge date and pending counts attached.
    pub encounters: DataFrame,
    /// Raw observation projection with normalized encounter references.
    pub observations: DataFrame,
    /// Matched observations with delay and classification columns.
    pub classified: DataFrame,
    pub summary: SummaryStats,
    pub distribution: Distribution,
}

/// Run the pending-lab computation pipeline.
///
/// A linear pass: normalize references, filter encounters, join, classify,
/// aggregate, bucket. Empty inputs flow through and produce zeroed
/// statistics rather than errors.
pub fn run_analysis(
    encounters: DataFrame,
    observations: DataFrame,
    options: &AnalysisOptions,
) -> Result<Analysis> {
    let span = info_span!("analyze", policy = ?options.policy, reference = ?options.reference);
    let _guard = span.enter();

    let mut encounters = encounters;
    let mut observations = observations;

    derive_discharge_date(&mut encounters)?;
    let normalized = normalize_observation_refs(&mut observations)?;
    if normalized > 0 {
        debug!(normalized, "stripped resource prefixes from encounter references");
    }

    let filtered = filter_encounter_class(&encounters, options.encounter_class.as_deref())?;
    let mut classified = join_delays(&observations, &filtered, options.reference)?;
    classify(&mut classified, options.policy)?;
    attach_pending_counts(&mut encounters, &classified)?;
    let summary = summarize(
        &encounters,
        filtered.height(),
        observations.height(),
        &classified,
    )?;
    let distribution = Distribution::from_classified(&classified)?;

    Ok(Analysis {
        encounters,
        observations,
        classified,
        summary,
        distribution,
    })
}
