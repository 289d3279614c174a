//! Integration tests for exports and rendering of a full query.

use salesboard_data::synthetic::{self, SyntheticConfig};
use salesboard_data::{Month, SalesTable, load};
use salesboard_engine::{DashboardConfig, FilterCriteria, MonthRange, run_query};
use salesboard_output::{
    BreakdownTable, ExportFormat, KpiSummary, ReportBuilder, RowPreview, write_exports,
};

fn table() -> SalesTable {
    SalesTable::new(synthetic::generate(&SyntheticConfig {
        min_rows: 6,
        max_rows: 10,
        ..SyntheticConfig::default()
    }))
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("salesboard_output_{}_{name}", std::process::id()))
}

#[test]
fn test_export_workflow() {
    let table = table();
    let criteria = DashboardConfig::default()
        .default_criteria(table.dimensions())
        .unwrap();
    let report = run_query(&table, &criteria);
    assert!(!report.is_empty());

    let dir = temp_dir("csv");
    let paths = write_exports(&report, &dir, ExportFormat::Csv).unwrap();
    assert!(paths.filtered.ends_with("filtered.csv"));
    assert!(paths.summary.ends_with("summary.csv"));

    // The filtered export is itself a loadable dataset.
    let reloaded = load(&paths.filtered).unwrap();
    assert_eq!(reloaded.len(), report.matched_rows.len());
    assert!(reloaded.iter().all(|r| criteria.matches(r)));

    let summary = std::fs::read_to_string(&paths.summary).unwrap();
    let mut lines = summary.lines();
    assert_eq!(
        lines.next(),
        Some("month,segment,channel,total_sales,b2b_billed_amount_sum,enabled_pct,b2b_pct")
    );
    assert_eq!(lines.count(), report.summary().len());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_json_exports() {
    let table = table();
    let criteria = FilterCriteria::new(
        "CURICO",
        ["MAYORISTA"],
        ["KKAA"],
        MonthRange::single(Month::new(2024, 5).unwrap()),
    );
    let report = run_query(&table, &criteria);

    let dir = temp_dir("json");
    let paths = write_exports(&report, &dir, ExportFormat::PrettyJson).unwrap();

    let rows: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.filtered).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), report.matched_rows.len());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_selection_exports_headers_only() {
    let table = table();
    let criteria = FilterCriteria::new(
        "TALCA",
        Vec::<String>::new(),
        ["KKAA"],
        MonthRange::single(Month::new(2024, 5).unwrap()),
    );
    let report = run_query(&table, &criteria);
    assert!(report.is_empty());

    let dir = temp_dir("empty");
    let paths = write_exports(&report, &dir, ExportFormat::Csv).unwrap();

    let filtered = std::fs::read_to_string(&paths.filtered).unwrap();
    assert_eq!(filtered.lines().count(), 1);

    let summary = KpiSummary::from_report(&report);
    assert!(summary.to_ascii_table().contains("No data"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_full_rendering_workflow() {
    let table = table();
    let criteria = DashboardConfig::default()
        .default_criteria(table.dimensions())
        .unwrap();
    let report = run_query(&table, &criteria);

    let ascii = KpiSummary::from_report(&report).to_ascii_table();
    assert!(ascii.contains("B2B Dashboard: TALCA"));
    assert!(ascii.contains("2024-12 to 2025-05"));

    let tables = BreakdownTable::all(&report);
    assert_eq!(tables[0].rows.len(), 6);
    assert_eq!(tables[1].rows.len(), 1);
    assert!((1..=4).contains(&tables[2].rows.len()));

    let markdown: String = tables.iter().map(BreakdownTable::to_markdown).collect();
    assert!(markdown.contains("## Monthly series"));
    assert!(markdown.contains("| 2025-05 |"));

    let preview = RowPreview::from_report(&report, 5);
    assert_eq!(preview.rows().len(), 5);
    assert!(preview.rows().iter().all(|r| r.period == Month::new(2025, 5).unwrap()));
}

#[test]
fn test_report_envelope() {
    let table = table();
    let criteria = DashboardConfig::default()
        .default_criteria(table.dimensions())
        .unwrap();
    let report = run_query(&table, &criteria);

    let envelope = ReportBuilder::from_dashboard(&report).unwrap().build().unwrap();
    assert_eq!(envelope.branch, "TALCA");
    assert_eq!(envelope.window_end, Month::new(2025, 5).unwrap());
    assert_eq!(envelope.contents["previous_window"]["start"], "2024-06");

    let json = envelope.to_json().unwrap();
    assert!(json.contains("\"generated_at\""));
}
