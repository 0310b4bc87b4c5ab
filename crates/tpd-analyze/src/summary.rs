//! Per-encounter aggregation and summary scalars.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use serde::Serialize;
use tracing::info;

use tpd_model::columns::{encounter, observation};

use crate::normalize::utf8_values;

/// Count pending observations per encounter and left-join the counts onto
/// the full encounter set, filling absent counts with zero.
pub fn attach_pending_counts(encounters: &mut DataFrame, classified: &DataFrame) -> Result<()> {
    let counts = pending_counts_by_encounter(classified)?;
    let ids = utf8_values(encounters, encounter::ID)?;
    let column: Vec<i64> = ids
        .iter()
        .map(|id| {
            id.as_deref()
                .and_then(|key| counts.get(key.trim()).copied())
                .unwrap_or(0)
        })
        .collect();
    encounters
        .with_column(Series::new(encounter::PENDING_LAB_COUNT.into(), column).into_column())
        .context("append pending count column")?;
    Ok(())
}

fn pending_counts_by_encounter(classified: &DataFrame) -> Result<BTreeMap<String, i64>> {
    let ids = utf8_values(classified, observation::ENCOUNTER_ID)?;
    let pending = bool_values(classified, observation::IS_PENDING)?;
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for idx in 0..classified.height() {
        if !pending[idx] {
            continue;
        }
        let Some(id) = ids[idx].as_deref() else {
            continue;
        };
        *counts.entry(id.trim().to_string()).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Summary scalars for the console report.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    /// Every encounter in the projection.
    pub total_encounters: usize,
    /// Encounters surviving the class filter (the rate denominator).
    pub filtered_encounters: usize,
    /// Every observation in the projection, matched or not.
    pub total_observations: usize,
    /// Observations that joined an encounter.
    pub matched_observations: usize,
    /// Culture observations among the matched set.
    pub matched_cultures: usize,
    /// Non-culture observations among the matched set.
    pub matched_other: usize,
    /// Observations classified pending under the active policy.
    pub total_pending: usize,
    /// Encounters with at least one pending observation.
    pub encounters_with_pending: usize,
    /// `encounters_with_pending / filtered_encounters * 100`; zero when
    /// the denominator is zero.
    pub pending_rate: f64,
    /// Mean pending count among encounters with pending labs.
    pub avg_pending: Option<f64>,
    /// Largest pending count on a single encounter.
    pub max_pending: Option<i64>,
}

/// Compute the summary scalars from the derived frames.
pub fn summarize(
    encounters: &DataFrame,
    filtered_encounters: usize,
    total_observations: usize,
    classified: &DataFrame,
) -> Result<SummaryStats> {
    let pending = bool_values(classified, observation::IS_PENDING)?;
    let cultures = bool_values(classified, observation::IS_CULTURE)?;
    let matched_observations = classified.height();
    let matched_cultures = cultures.iter().filter(|flag| **flag).count();
    let total_pending = pending.iter().filter(|flag| **flag).count();

    let counts: Vec<i64> = {
        let column = encounters
            .column(encounter::PENDING_LAB_COUNT)
            .context("encounters are missing the pending count column")?;
        let ca = column
            .i64()
            .context("pending count column is not an integer column")?;
        ca.into_iter().map(|opt| opt.unwrap_or(0)).collect()
    };
    let with_pending: Vec<i64> = counts.iter().copied().filter(|count| *count > 0).collect();
    let encounters_with_pending = with_pending.len();
    let pending_rate = if filtered_encounters > 0 {
        encounters_with_pending as f64 / filtered_encounters as f64 * 100.0
    } else {
        0.0
    };
    let avg_pending = if with_pending.is_empty() {
        None
    } else {
        Some(with_pending.iter().sum::<i64>() as f64 / with_pending.len() as f64)
    };
    let max_pending = with_pending.iter().max().copied();

    let stats = SummaryStats {
        total_encounters: encounters.height(),
        filtered_encounters,
        total_observations,
        matched_observations,
        matched_cultures,
        matched_other: matched_observations - matched_cultures,
        total_pending,
        encounters_with_pending,
        pending_rate,
        avg_pending,
        max_pending,
    };
    info!(
        total_encounters = stats.total_encounters,
        filtered_encounters = stats.filtered_encounters,
        total_observations = stats.total_observations,
        matched_observations = stats.matched_observations,
        total_pending = stats.total_pending,
        encounters_with_pending = stats.encounters_with_pending,
        pending_rate = stats.pending_rate,
        "summary computed"
    );
    Ok(stats)
}

pub(crate) fn bool_values(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?;
    let ca = column
        .bool()
        .with_context(|| format!("column {name} is not a boolean column"))?;
    Ok(ca.into_iter().map(|opt| opt.unwrap_or(false)).collect())
}
