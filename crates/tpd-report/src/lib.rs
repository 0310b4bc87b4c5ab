//! Output generation for the pending-lab analysis.
//!
//! Two boundary responsibilities live here:
//!
//! - **CSV export**: lossless serialization of the encounter and
//!   observation tables with a header row and stable column order.
//! - **Chart specification**: a declarative description of the stacked
//!   "results after discharge" bar chart (axis bindings, color mapping,
//!   layout), serialized into a standalone HTML file. Rendering happens
//!   externally, in the browser; no plotting logic lives in this crate.

mod chart;
mod csv_export;

pub use chart::{
    Axis, BarTrace, ChartSpec, Font, Layout, Legend, Margin, Marker, Title, pending_by_day_chart,
    write_chart_html,
};
pub use csv_export::{read_table, write_table};

/// Fixed output file name for the encounter table.
pub const ENCOUNTERS_CSV: &str = "analysis_encounters.csv";
/// Fixed output file name for the lab observation table.
pub const OBSERVATIONS_CSV: &str = "analysis_lab_observations.csv";
/// Fixed output file name for the distribution chart.
pub const CHART_HTML: &str = "tests_pending_by_day.html";
