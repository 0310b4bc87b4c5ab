//! Column normalization and encounter filtering ahead of the join.

use anyhow::{Context, Result};
use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};

use tpd_model::TpdError;
use tpd_model::columns::{encounter, observation};

use crate::datetime::date_part;

/// Strip a `ResourceType/` prefix from a reference, leaving the bare id.
pub fn normalize_encounter_ref(value: &str) -> &str {
    value
        .split_once('/')
        .map_or(value, |(_prefix, rest)| rest)
}

/// Rewrite the observation foreign-key column to bare encounter ids.
///
/// Returns how many values carried a prefix.
pub fn normalize_observation_refs(observations: &mut DataFrame) -> Result<usize> {
    let values = utf8_values(observations, observation::ENCOUNTER_ID)?;
    let mut modified = 0usize;
    let normalized: Vec<Option<String>> = values
        .iter()
        .map(|value| {
            value.as_deref().map(|raw| {
                let bare = normalize_encounter_ref(raw);
                if bare != raw {
                    modified += 1;
                }
                bare.to_string()
            })
        })
        .collect();
    if modified > 0 {
        let series = Series::new(observation::ENCOUNTER_ID.into(), normalized);
        observations
            .with_column(series)
            .context("replace encounter reference column")?;
    }
    Ok(modified)
}

/// Append the derived discharge date (calendar date of `end_time`).
pub fn derive_discharge_date(encounters: &mut DataFrame) -> Result<()> {
    let ends = utf8_values(encounters, encounter::END_TIME)?;
    let dates: Vec<Option<String>> = ends
        .iter()
        .map(|value| {
            value
                .as_deref()
                .and_then(date_part)
                .map(str::to_string)
        })
        .collect();
    let series = Series::new(encounter::DISCHARGE_DATE.into(), dates);
    encounters
        .with_column(series)
        .context("append discharge date column")?;
    Ok(())
}

/// Restrict encounters to one class code; `None` keeps everything.
pub fn filter_encounter_class(encounters: &DataFrame, class: Option<&str>) -> Result<DataFrame> {
    let Some(class) = class else {
        return Ok(encounters.clone());
    };
    let values = utf8_values(encounters, encounter::CLASS)?;
    let mask: Vec<bool> = values
        .iter()
        .map(|value| {
            value
                .as_deref()
                .is_some_and(|code| code.trim().eq_ignore_ascii_case(class))
        })
        .collect();
    let mask = BooleanChunked::from_slice("class_mask".into(), &mask);
    encounters
        .filter(&mask)
        .with_context(|| format!("filter encounters to class {class}"))
}

/// Read a string column as owned optional values.
pub(crate) fn utf8_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| TpdError::MissingColumn(name.to_string()))?;
    let ca = column
        .str()
        .with_context(|| format!("column {name} is not a string column"))?;
    Ok(ca.into_iter().map(|opt| opt.map(str::to_string)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_strip_to_bare_id() {
        assert_eq!(normalize_encounter_ref("Encounter/e1"), "e1");
        assert_eq!(normalize_encounter_ref("e1"), "e1");
        assert_eq!(normalize_encounter_ref(""), "");
    }
}
