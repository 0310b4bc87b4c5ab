//! Temporal join of observations onto encounters.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use tpd_model::ReferencePoint;
use tpd_model::columns::{encounter, observation};

use crate::datetime::{delay_days, parse_instant};
use crate::normalize::utf8_values;

/// Inner-join observations onto the (already filtered) encounter set and
/// compute the result delay.
///
/// Observations whose foreign key matches no encounter are dropped here;
/// they still count toward the raw totals the caller reports separately.
/// The output carries the observation columns plus the matched encounter's
/// `start_time`/`end_time` and a `delay_days` float that is null whenever
/// either timestamp fails to parse.
pub fn join_delays(
    observations: &DataFrame,
    encounters: &DataFrame,
    reference: ReferencePoint,
) -> Result<DataFrame> {
    let enc_ids = utf8_values(encounters, encounter::ID)?;
    let enc_starts = utf8_values(encounters, encounter::START_TIME)?;
    let enc_ends = utf8_values(encounters, encounter::END_TIME)?;

    let mut bounds: BTreeMap<String, (Option<String>, Option<String>)> = BTreeMap::new();
    for idx in 0..encounters.height() {
        let Some(id) = enc_ids[idx].as_deref() else {
            continue;
        };
        let id = id.trim();
        if id.is_empty() {
            continue;
        }
        bounds
            .entry(id.to_string())
            .or_insert_with(|| (enc_starts[idx].clone(), enc_ends[idx].clone()));
    }

    let mut source: Vec<Vec<Option<String>>> = Vec::with_capacity(observation::PROJECTED.len());
    for name in observation::PROJECTED {
        source.push(utf8_values(observations, name)?);
    }
    let fk_index = observation::PROJECTED
        .iter()
        .position(|name| *name == observation::ENCOUNTER_ID)
        .context("projection lacks the encounter reference column")?;
    let issued_index = observation::PROJECTED
        .iter()
        .position(|name| *name == observation::ISSUED_TIME)
        .context("projection lacks the issued time column")?;

    let mut kept: Vec<Vec<Option<String>>> = vec![Vec::new(); observation::PROJECTED.len()];
    let mut starts: Vec<Option<String>> = Vec::new();
    let mut ends: Vec<Option<String>> = Vec::new();
    let mut delays: Vec<Option<f64>> = Vec::new();

    for idx in 0..observations.height() {
        let Some(fk) = source[fk_index][idx].as_deref() else {
            continue;
        };
        let Some((start, end)) = bounds.get(fk.trim()) else {
            continue;
        };
        for (column, values) in kept.iter_mut().zip(&source) {
            column.push(values[idx].clone());
        }
        let anchor = match reference {
            ReferencePoint::EncounterStart => start.as_deref(),
            ReferencePoint::Discharge => end.as_deref(),
        };
        let issued = source[issued_index][idx].as_deref().and_then(parse_instant);
        let anchor = anchor.and_then(parse_instant);
        let delay = match (issued, anchor) {
            (Some(issued), Some(anchor)) => Some(delay_days(issued, anchor)),
            _ => None,
        };
        starts.push(start.clone());
        ends.push(end.clone());
        delays.push(delay);
    }

    let mut columns: Vec<Column> = Vec::with_capacity(observation::PROJECTED.len() + 3);
    for (name, values) in observation::PROJECTED.iter().zip(kept) {
        columns.push(Series::new((*name).into(), values).into_column());
    }
    columns.push(Series::new(encounter::START_TIME.into(), starts).into_column());
    columns.push(Series::new(encounter::END_TIME.into(), ends).into_column());
    columns.push(Series::new(observation::DELAY_DAYS.into(), delays).into_column());

    let joined = DataFrame::new(columns).context("assemble joined frame")?;
    debug!(
        observation_count = observations.height(),
        encounter_count = encounters.height(),
        matched = joined.height(),
        dropped = observations.height() - joined.height(),
        "temporal join complete"
    );
    Ok(joined)
}
