//! Day-bucket distribution of pending observations.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use tpd_model::DelayBucket;
use tpd_model::columns::observation;

use crate::normalize::utf8_values;
use crate::summary::bool_values;

/// One (bucket, category) cell of the distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRow {
    pub bucket: DelayBucket,
    pub category: String,
    pub count: u64,
}

/// Counts of pending observations per (bucket, category), always held in
/// fixed bucket order regardless of how the underlying data was sorted.
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    rows: Vec<DistributionRow>,
    total: u64,
}

impl Distribution {
    /// Build the distribution from a classified frame.
    ///
    /// Only pending observations participate. A pending observation with a
    /// null delay cannot be placed on the time axis and is skipped.
    pub fn from_classified(classified: &DataFrame) -> Result<Self> {
        let pending = bool_values(classified, observation::IS_PENDING)?;
        let categories = utf8_values(classified, observation::CATEGORY)?;
        let delays: Vec<Option<f64>> = {
            let column = classified
                .column(observation::DELAY_DAYS)
                .context("classified frame is missing the delay column")?;
            let ca = column.f64().context("delay column is not a float column")?;
            ca.into_iter().collect()
        };

        let mut cells: BTreeMap<(usize, String), u64> = BTreeMap::new();
        let mut total = 0u64;
        for idx in 0..classified.height() {
            if !pending[idx] {
                continue;
            }
            let Some(days) = delays[idx] else {
                continue;
            };
            let bucket = DelayBucket::from_days(days);
            let category = categories[idx].clone().unwrap_or_default();
            *cells.entry((bucket.index(), category)).or_insert(0) += 1;
            total += 1;
        }

        let rows = cells
            .into_iter()
            .map(|((index, category), count)| DistributionRow {
                bucket: DelayBucket::ALL[index],
                category,
                count,
            })
            .collect();
        Ok(Self { rows, total })
    }

    /// All cells in bucket-major display order.
    pub fn rows(&self) -> &[DistributionRow] {
        &self.rows
    }

    /// Total pending observations placed in buckets.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct categories in display order.
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rows.iter().map(|row| row.category.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Count in one (bucket, category) cell.
    pub fn cell(&self, bucket: DelayBucket, category: &str) -> u64 {
        self.rows
            .iter()
            .find(|row| row.bucket == bucket && row.category == category)
            .map_or(0, |row| row.count)
    }

    /// Count across all categories in one bucket.
    pub fn bucket_total(&self, bucket: DelayBucket) -> u64 {
        self.rows
            .iter()
            .filter(|row| row.bucket == bucket)
            .map(|row| row.count)
            .sum()
    }

    /// Share of the whole distribution held by one bucket, in percent.
    pub fn bucket_percentage(&self, bucket: DelayBucket) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.bucket_total(bucket) as f64 / self.total as f64 * 100.0
        }
    }

    /// Flatten into a (bucket, category, count) frame in display order,
    /// ready for export or charting.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let buckets: Vec<&str> = self.rows.iter().map(|row| row.bucket.label()).collect();
        let categories: Vec<&str> = self.rows.iter().map(|row| row.category.as_str()).collect();
        let counts: Vec<u64> = self.rows.iter().map(|row| row.count).collect();
        let columns: Vec<Column> = vec![
            Series::new(observation::BUCKET.into(), buckets).into_column(),
            Series::new(observation::CATEGORY.into(), categories).into_column(),
            Series::new("count".into(), counts).into_column(),
        ];
        DataFrame::new(columns).context("assemble distribution frame")
    }
}
