//! KPI cards and breakdown tables for terminal and markdown output.
//!
//! The dashboard view of a query is three KPI cards (sales, enabled share,
//! B2B share), each with its change against the previous window, followed
//! by the monthly series and the segment and channel breakdowns.

use salesboard_data::SalesRecord;
use salesboard_engine::{DashboardReport, Deltas, GroupAggregate, GroupKey, MonthRange};
use serde::Serialize;
use std::fmt;

const RULE_WIDTH: usize = 72;

/// Format an amount as whole currency units with thousands separators.
///
/// # Examples
///
/// ```
/// use salesboard_output::format_money;
///
/// assert_eq!(format_money(1_234_567.4), "$1,234,567");
/// assert_eq!(format_money(999.5), "$1,000");
/// assert_eq!(format_money(-2500.0), "-$2,500");
/// ```
pub fn format_money(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let digits = (rounded.abs() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Format a percentage change with sign and one decimal.
///
/// # Examples
///
/// ```
/// use salesboard_output::format_delta;
///
/// assert_eq!(format_delta(1.23), "+1.2%");
/// assert_eq!(format_delta(-4.0), "-4.0%");
/// assert_eq!(format_delta(0.0), "+0.0%");
/// ```
pub fn format_delta(delta: f64) -> String {
    // Avoid "-0.0%" for tiny negative changes.
    let rounded = (delta * 10.0).round() / 10.0;
    let value = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{value:+.1}%")
}

/// Format a percentage with one decimal, or `n/a` when absent.
pub fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"))
}

/// One KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    /// Card title.
    pub title: &'static str,

    /// Formatted current value.
    pub value: String,

    /// Formatted change against the previous window.
    pub delta: String,
}

/// Headline KPIs of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Branch reported on.
    pub branch: String,

    /// Current window.
    pub current_window: MonthRange,

    /// Previous window.
    pub previous_window: MonthRange,

    /// Rows in the current window.
    pub matched_rows: usize,

    /// Total sales in the current window.
    pub total_sales: f64,

    /// Share of enabled rows in the current window.
    pub enabled_pct: Option<f64>,

    /// B2B share of sales in the current window.
    pub b2b_pct: f64,

    /// Changes against the previous window.
    pub deltas: Deltas,
}

impl KpiSummary {
    /// Summarize a report.
    pub fn from_report(report: &DashboardReport<'_>) -> Self {
        Self {
            branch: report.criteria.branch.clone(),
            current_window: report.current_window,
            previous_window: report.previous_window,
            matched_rows: report.matched_rows.len(),
            total_sales: report.current.total_sales,
            enabled_pct: report.current.enabled_pct,
            b2b_pct: report.current.b2b_pct,
            deltas: report.deltas,
        }
    }

    /// Whether the current window had no rows.
    pub const fn is_empty(&self) -> bool {
        self.matched_rows == 0
    }

    /// The three KPI cards in display order.
    pub fn cards(&self) -> [KpiCard; 3] {
        [
            KpiCard {
                title: "Sales",
                value: format_money(self.total_sales),
                delta: format_delta(self.deltas.total_sales),
            },
            KpiCard {
                title: "% B2B enabled",
                value: format_pct(self.enabled_pct),
                delta: format_delta(self.deltas.enabled_pct),
            },
            KpiCard {
                title: "% B2B billed",
                value: format!("{:.1}%", self.b2b_pct),
                delta: format_delta(self.deltas.b2b_pct),
            },
        ]
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nB2B Dashboard: {}\n", self.branch));
        output.push_str(&format!(
            "Period: {} (vs {})\n",
            self.current_window, self.previous_window
        ));
        output.push_str(&"=".repeat(RULE_WIDTH));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No data for the selected filters.\n");
        } else {
            output.push_str(&format!("{:<20} {:>20} {:>14}\n", "KPI", "Value", "vs prev."));
            output.push_str(&"-".repeat(RULE_WIDTH));
            output.push('\n');
            for card in self.cards() {
                output.push_str(&format!(
                    "{:<20} {:>20} {:>14}\n",
                    card.title, card.value, card.delta
                ));
            }
            output.push_str(&format!("\n{} rows matched\n", self.matched_rows));
        }

        output.push_str(&"=".repeat(RULE_WIDTH));
        output.push('\n');

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# B2B Dashboard: {}\n\n", self.branch));
        output.push_str(&format!(
            "**Period:** {} (vs {})\n\n",
            self.current_window, self.previous_window
        ));

        if self.is_empty() {
            output.push_str("_No data for the selected filters._\n");
            return output;
        }

        output.push_str("| KPI | Value | vs prev. |\n");
        output.push_str("|-----|------:|---------:|\n");
        for card in self.cards() {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                card.title, card.value, card.delta
            ));
        }
        output.push_str(&format!("\n{} rows matched\n", self.matched_rows));

        output
    }
}

impl fmt::Display for KpiSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.branch, self.current_window)?;
        for card in self.cards() {
            writeln!(f, "  {}: {} ({})", card.title, card.value, card.delta)?;
        }
        Ok(())
    }
}

/// One line of a breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    /// Group value.
    pub label: String,

    /// Sales of the group.
    pub total_sales: f64,

    /// Share of enabled rows in the group.
    pub enabled_pct: Option<f64>,

    /// B2B percentage shown for the group.
    pub b2b_pct: f64,
}

/// Monthly series or categorical breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownTable {
    /// Grouping key.
    pub key: GroupKey,

    /// Rows in display order.
    pub rows: Vec<BreakdownRow>,
}

impl BreakdownTable {
    fn build(key: GroupKey, groups: &[GroupAggregate]) -> Self {
        let rows = groups
            .iter()
            .map(|g| BreakdownRow {
                label: g.label.clone(),
                total_sales: g.metrics.total_sales,
                enabled_pct: g.metrics.enabled_pct,
                // Months show their own share, categories their share of the whole.
                b2b_pct: match key {
                    GroupKey::Month => g.metrics.b2b_pct,
                    GroupKey::Segment | GroupKey::Channel => g.pct_b2b,
                },
            })
            .collect();
        Self { key, rows }
    }

    /// Per-month series of a report.
    pub fn monthly(report: &DashboardReport<'_>) -> Self {
        Self::build(GroupKey::Month, &report.monthly_series)
    }

    /// Per-segment breakdown of a report.
    pub fn segments(report: &DashboardReport<'_>) -> Self {
        Self::build(GroupKey::Segment, &report.by_segment)
    }

    /// Per-channel breakdown of a report.
    pub fn channels(report: &DashboardReport<'_>) -> Self {
        Self::build(GroupKey::Channel, &report.by_channel)
    }

    /// All three tables of a report.
    pub fn all(report: &DashboardReport<'_>) -> [Self; 3] {
        [
            Self::monthly(report),
            Self::segments(report),
            Self::channels(report),
        ]
    }

    const fn title(&self) -> &'static str {
        match self.key {
            GroupKey::Month => "Monthly series",
            GroupKey::Segment => "By segment",
            GroupKey::Channel => "By channel",
        }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}:\n", self.title()));
        output.push_str(&"-".repeat(RULE_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>20} {:>14} {:>14}\n",
            self.key.name(),
            "Sales",
            "% enabled",
            "% B2B"
        ));
        output.push_str(&"-".repeat(RULE_WIDTH));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<20} {:>20} {:>14} {:>13.1}%\n",
                row.label,
                format_money(row.total_sales),
                format_pct(row.enabled_pct),
                row.b2b_pct
            ));
        }

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", self.title()));
        output.push_str(&format!("| {} | Sales | % enabled | % B2B |\n", self.key.name()));
        output.push_str("|---|---:|---:|---:|\n");
        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {:.1}% |\n",
                row.label,
                format_money(row.total_sales),
                format_pct(row.enabled_pct),
                row.b2b_pct
            ));
        }
        output.push('\n');

        output
    }
}

/// Detail rows preview.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPreview<'a> {
    rows: Vec<&'a SalesRecord>,
    total: usize,
}

impl<'a> RowPreview<'a> {
    /// The `limit` most recent current-window rows of a report.
    pub fn from_report(report: &DashboardReport<'a>, limit: usize) -> Self {
        Self {
            rows: report.latest_rows(limit),
            total: report.matched_rows.len(),
        }
    }

    /// Rows shown.
    pub fn rows(&self) -> &[&'a SalesRecord] {
        &self.rows
    }

    fn footer(&self) -> Option<String> {
        (self.rows.len() < self.total)
            .then(|| format!("showing {} of {} rows", self.rows.len(), self.total))
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nDetail:\n");
        output.push_str(&"-".repeat(RULE_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:<14} {:<10} {:>14} {:>7} {:>14}\n",
            "month", "segment", "channel", "total", "b2b", "billed"
        ));
        for r in &self.rows {
            output.push_str(&format!(
                "{:<8} {:<14} {:<10} {:>14.2} {:>7} {:>14.2}\n",
                r.period,
                r.segment,
                r.channel,
                r.total_amount,
                u8::from(r.b2b_enabled),
                r.b2b_billed_amount
            ));
        }
        if let Some(footer) = self.footer() {
            output.push_str(&format!("({footer})\n"));
        }

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("## Detail\n\n");
        output.push_str("| month | segment | channel | total | b2b | billed |\n");
        output.push_str("|---|---|---|---:|---:|---:|\n");
        for r in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} | {} | {:.2} |\n",
                r.period,
                r.segment,
                r.channel,
                r.total_amount,
                u8::from(r.b2b_enabled),
                r.b2b_billed_amount
            ));
        }
        if let Some(footer) = self.footer() {
            output.push_str(&format!("\n_{footer}_\n"));
        }

        output
    }
}
