//! Console report rendering.
//!
//! The report keeps the fixed numbered sections of the original demo
//! script; the statistics tables use `comfy-table` styling.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tpd_analyze::{Distribution, SummaryStats};
use tpd_model::{AnalysisOptions, DelayBucket, PendingPolicy, ReferencePoint};

use crate::pipeline::{ExportResult, ProjectionResult};

pub fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("Tests Pending at Discharge - Analysis");
    println!("{}", "=".repeat(60));
}

/// Section 1/2/3: input loading and projection counts.
pub fn print_projection(projection: &ProjectionResult) {
    println!("\n1. Loading source data...");
    println!("   Loaded {} encounter resources", projection.encounter_resources);
    println!(
        "   Loaded {} observation resources",
        projection.observation_resources
    );
    println!("\n2. View documents");
    println!("   - EncounterView");
    println!("   - LabObservationView");
    println!("\n3. Tabular projections");
    println!("   Encounter rows: {}", projection.encounters.height());
    println!("   Lab observation rows: {}", projection.observations.height());
}

/// Section 4: summary statistics.
pub fn print_summary(stats: &SummaryStats, options: &AnalysisOptions) {
    println!("\n4. Summary statistics");
    println!("   Policy: {}", policy_label(options.policy));
    println!("   Reference: {}", reference_label(options.reference));
    match options.encounter_class.as_deref() {
        Some(class) => println!("   Encounter class filter: {class}"),
        None => println!("   Encounter class filter: none"),
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Statistic"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Total encounters"),
        Cell::new(stats.total_encounters),
    ]);
    table.add_row(vec![
        Cell::new("Encounters in filter"),
        Cell::new(stats.filtered_encounters),
    ]);
    table.add_row(vec![
        Cell::new("Total lab observations"),
        Cell::new(stats.total_observations),
    ]);
    table.add_row(vec![
        Cell::new("Matched observations"),
        Cell::new(stats.matched_observations),
    ]);
    table.add_row(vec![
        Cell::new("  - Cultures"),
        Cell::new(stats.matched_cultures),
    ]);
    table.add_row(vec![Cell::new("  - Other"), Cell::new(stats.matched_other)]);
    table.add_row(vec![
        Cell::new("Pending observations"),
        Cell::new(stats.total_pending),
    ]);
    table.add_row(vec![
        Cell::new("Encounters with pending labs"),
        Cell::new(stats.encounters_with_pending),
    ]);
    table.add_row(vec![
        Cell::new("Pending lab rate"),
        rate_cell(stats.pending_rate),
    ]);
    if let Some(avg) = stats.avg_pending {
        table.add_row(vec![
            Cell::new("Average pending per encounter"),
            Cell::new(format!("{avg:.2}")),
        ]);
    }
    if let Some(max) = stats.max_pending {
        table.add_row(vec![Cell::new("Maximum pending (single encounter)"), Cell::new(max)]);
    }
    println!("{table}");
}

/// Section 5: distribution by day bucket.
pub fn print_distribution(distribution: &Distribution) {
    println!("\n5. Distribution by bucket");
    if distribution.is_empty() {
        println!("   No pending labs found");
        return;
    }
    for line in distribution_lines(distribution) {
        println!("   {line}");
    }
}

/// Section 6: written files.
pub fn print_exports(export: &ExportResult) {
    println!("\n6. Exported files");
    println!("   - {}", export.encounters_csv.display());
    println!("   - {}", export.observations_csv.display());
    if let Some(chart) = &export.chart {
        println!("   - {}", chart.display());
    }
    println!("\n{}", "=".repeat(60));
    println!("Analysis complete!");
    println!("{}", "=".repeat(60));
    if export.chart.is_some() {
        println!("\nOpen the chart HTML in a browser to view the visualization.");
    }
}

/// One line per bucket in fixed order, with per-category counts.
pub fn distribution_lines(distribution: &Distribution) -> Vec<String> {
    let categories = distribution.categories();
    DelayBucket::ALL
        .iter()
        .map(|bucket| {
            let total = distribution.bucket_total(*bucket);
            let pct = distribution.bucket_percentage(*bucket);
            let parts: Vec<String> = categories
                .iter()
                .map(|category| format!("{category}: {}", distribution.cell(*bucket, category)))
                .collect();
            if parts.is_empty() {
                format!("{:<5}: {:>4} ({:>5.1}%)", bucket.label(), total, pct)
            } else {
                format!(
                    "{:<5}: {:>4} ({:>5.1}%) - {}",
                    bucket.label(),
                    total,
                    pct,
                    parts.join(", ")
                )
            }
        })
        .collect()
}

/// Bucket listing for the `buckets` subcommand.
pub fn bucket_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Bucket"), header_cell("Delay range (days)")]);
    apply_table_style(&mut table);
    let ranges = [
        "delay <= 1",
        "1 < delay <= 2",
        "2 < delay <= 3",
        "3 < delay <= 4",
        "4 < delay <= 6",
        "6 < delay <= 10",
        "delay > 10",
    ];
    for (bucket, range) in DelayBucket::ALL.iter().zip(ranges) {
        table.add_row(vec![Cell::new(bucket.label()), Cell::new(range)]);
    }
    table
}

fn policy_label(policy: PendingPolicy) -> &'static str {
    match policy {
        PendingPolicy::DelayBased => "delay-based (issued after reference instant)",
        PendingPolicy::StatusBased => "status-based (result status not final)",
    }
}

fn reference_label(reference: ReferencePoint) -> &'static str {
    match reference {
        ReferencePoint::EncounterStart => "encounter start",
        ReferencePoint::Discharge => "discharge (encounter end)",
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn rate_cell(rate: f64) -> Cell {
    let text = format!("{rate:.1}%");
    if rate > 0.0 {
        Cell::new(text).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        Cell::new(text).fg(Color::DarkGrey)
    }
}
