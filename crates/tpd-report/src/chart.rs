//! Declarative chart specification for the distribution chart.
//!
//! The spec mirrors the Plotly figure JSON schema: one bar trace per
//! category, stacked over the fixed bucket axis. The HTML writer embeds
//! the spec next to a CDN script tag and leaves rendering to the browser.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use tpd_analyze::{CULTURES_CATEGORY, Distribution, OTHER_CATEGORY};
use tpd_model::DelayBucket;

/// Stacking color for the culture category (dark blue).
const CULTURES_COLOR: &str = "#1f4e79";
/// Stacking color for the other category (light blue).
const OTHER_COLOR: &str = "#5b9bd5";
/// Fallback cycle for status-valued categories.
const STATUS_PALETTE: [&str; 6] = [
    "#1f4e79", "#5b9bd5", "#c55a11", "#70ad47", "#7030a0", "#bf9000",
];

#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub name: String,
    pub x: Vec<&'static str>,
    pub y: Vec<u64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub barmode: &'static str,
    pub height: u32,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    pub font: Font,
    pub margin: Margin,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub yanchor: &'static str,
    pub y: f64,
    pub xanchor: &'static str,
    pub x: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub b: u32,
}

/// Build the stacked "results after discharge" chart from a distribution.
///
/// One trace per category, each spanning all seven buckets (zero-filled),
/// so the stacking and the axis order are fixed by construction.
pub fn pending_by_day_chart(distribution: &Distribution, title: &str) -> ChartSpec {
    let labels: Vec<&'static str> = DelayBucket::ALL.iter().map(|bucket| bucket.label()).collect();
    let categories = distribution.categories();
    let data = categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let y: Vec<u64> = DelayBucket::ALL
                .iter()
                .map(|bucket| distribution.cell(*bucket, category))
                .collect();
            BarTrace {
                trace_type: "bar",
                name: category.clone(),
                x: labels.clone(),
                y,
                marker: Marker {
                    color: category_color(category, index),
                },
            }
        })
        .collect();

    ChartSpec {
        data,
        layout: Layout {
            title: Title {
                text: title.to_string(),
            },
            barmode: "stack",
            height: 500,
            xaxis: Axis {
                title: Title {
                    text: "Days post-discharge".to_string(),
                },
                categoryorder: Some("array"),
                categoryarray: Some(labels),
            },
            yaxis: Axis {
                title: Title {
                    text: "Volume".to_string(),
                },
                categoryorder: None,
                categoryarray: None,
            },
            legend: Legend {
                orientation: "h",
                yanchor: "top",
                y: 0.98,
                xanchor: "right",
                x: 0.98,
            },
            font: Font { size: 14 },
            margin: Margin { b: 80 },
        },
    }
}

fn category_color(category: &str, index: usize) -> String {
    match category {
        CULTURES_CATEGORY => CULTURES_COLOR.to_string(),
        OTHER_CATEGORY => OTHER_COLOR.to_string(),
        _ => STATUS_PALETTE[index % STATUS_PALETTE.len()].to_string(),
    }
}

/// Serialize a chart spec into a standalone HTML file.
pub fn write_chart_html(path: &Path, spec: &ChartSpec) -> Result<()> {
    let payload = serde_json::to_string(spec).context("encode chart spec")?;
    let generated = Utc::now().to_rfc3339();
    let html = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <script src=\"https://cdn.plot.ly/plotly-2.32.0.min.js\"></script>\n\
         </head>\n\
         <body>\n\
         <!-- generated {generated} -->\n\
         <div id=\"chart\"></div>\n\
         <script>\n\
         const spec = {payload};\n\
         Plotly.newPlot(\"chart\", spec.data, spec.layout);\n\
         </script>\n\
         </body>\n\
         </html>\n",
        title = spec.layout.title.text,
    );
    fs::write(path, html).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "chart written");
    Ok(())
}
