//! Pending classification and category derivation.

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use tpd_model::columns::observation;
use tpd_model::{ObservationStatus, PendingPolicy, is_culture_code};

use crate::normalize::utf8_values;

/// Label used for culture observations in the distribution.
pub const CULTURES_CATEGORY: &str = "Cultures";
/// Label used for everything else in the distribution.
pub const OTHER_CATEGORY: &str = "Other";

/// Append `is_pending`, `is_culture`, and `category` to a joined frame.
///
/// Exactly one policy drives `is_pending` for the whole run:
/// - delay-based: pending iff `delay_days > 0`; a null delay is not pending.
/// - status-based: pending iff the parsed status is not `final`.
///
/// The category column follows the policy: culture/other under the delay
/// policy, the canonical status code under the status policy.
pub fn classify(joined: &mut DataFrame, policy: PendingPolicy) -> Result<()> {
    let codes = utf8_values(joined, observation::LAB_CODE)?;
    let statuses = utf8_values(joined, observation::STATUS)?;
    let delays: Vec<Option<f64>> = {
        let column = joined
            .column(observation::DELAY_DAYS)
            .context("joined frame is missing the delay column")?;
        let ca = column.f64().context("delay column is not a float column")?;
        ca.into_iter().collect()
    };

    let cultures: Vec<bool> = codes
        .iter()
        .map(|code| code.as_deref().is_some_and(is_culture_code))
        .collect();

    let parsed_statuses: Vec<ObservationStatus> = statuses
        .iter()
        .map(|status| {
            status
                .as_deref()
                .unwrap_or("")
                .parse()
                .unwrap_or(ObservationStatus::Unknown)
        })
        .collect();

    let pending: Vec<bool> = match policy {
        PendingPolicy::DelayBased => delays
            .iter()
            .map(|delay| delay.is_some_and(|days| days > 0.0))
            .collect(),
        PendingPolicy::StatusBased => parsed_statuses
            .iter()
            .map(|status| !status.is_final())
            .collect(),
    };

    let categories: Vec<String> = match policy {
        PendingPolicy::DelayBased => cultures
            .iter()
            .map(|is_culture| {
                if *is_culture {
                    CULTURES_CATEGORY.to_string()
                } else {
                    OTHER_CATEGORY.to_string()
                }
            })
            .collect(),
        PendingPolicy::StatusBased => parsed_statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect(),
    };

    let pending_count = pending.iter().filter(|flag| **flag).count();
    joined
        .with_column(Series::new(observation::IS_PENDING.into(), pending).into_column())
        .context("append pending column")?;
    joined
        .with_column(Series::new(observation::IS_CULTURE.into(), cultures).into_column())
        .context("append culture column")?;
    joined
        .with_column(Series::new(observation::CATEGORY.into(), categories).into_column())
        .context("append category column")?;
    debug!(
        policy = ?policy,
        matched = joined.height(),
        pending_count,
        "classification complete"
    );
    Ok(())
}
