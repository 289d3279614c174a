//! Salesboard CLI binary.
//!
//! Loads a sales dataset and prints or exports period-over-period B2B KPIs.

mod settings;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use salesboard::Dashboard;
use salesboard_data::synthetic::{self, SyntheticConfig};
use salesboard_engine::DashboardReport;
use salesboard_output::{
    BreakdownTable, ExportFormat, KpiSummary, ReportBuilder, RowPreview, write_exports,
};
use settings::FilterArgs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(about = "Salesboard: period-over-period B2B sales reporting", long_about = None)]
#[command(version)]
struct Cli {
    /// Dashboard config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field delimiter of the dataset
    #[arg(long, global = true, default_value_t = ',')]
    delimiter: char,

    /// Clamp B2B billed amounts to the row total while loading
    #[arg(long, global = true)]
    clamp_billed: bool,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List branches, segments, channels and the month bounds of a dataset
    Dimensions {
        /// Dataset file
        #[arg(long)]
        data: PathBuf,
    },

    /// Print KPIs, breakdowns and a row preview
    Report {
        /// Dataset file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Rows in the detail preview (default: configured preview size)
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Write the filtered rows and their summary to files
    Export {
        /// Dataset file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormatArg::Csv)]
        format: ExportFormatArg,
    },

    /// Write a synthetic demo dataset
    Generate {
        /// Output file
        #[arg(long)]
        out: PathBuf,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormatArg {
    Csv,
    Json,
    PrettyJson,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => Self::Csv,
            ExportFormatArg::Json => Self::Json,
            ExportFormatArg::PrettyJson => Self::PrettyJson,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Dimensions { ref data } => {
            let dashboard = open(&cli, data)?;
            print_dimensions(&dashboard);
        }
        Commands::Report {
            ref data,
            ref filters,
            format,
            rows,
        } => {
            let dashboard = open(&cli, data)?;
            let Some(criteria) = filters.resolve(dashboard.config(), dashboard.table().dimensions())?
            else {
                println!("Dataset is empty.");
                return Ok(());
            };
            let report = dashboard.query(&criteria);
            let rows = rows.unwrap_or(dashboard.config().preview_rows);
            print_report(&report, format, rows)?;
        }
        Commands::Export {
            ref data,
            ref filters,
            ref out_dir,
            format,
        } => {
            let dashboard = open(&cli, data)?;
            let Some(criteria) = filters.resolve(dashboard.config(), dashboard.table().dimensions())?
            else {
                println!("Dataset is empty.");
                return Ok(());
            };
            let report = dashboard.query(&criteria);
            let paths = write_exports(&report, out_dir, format.into())?;
            println!(
                "Exported {} rows for {} ({})",
                report.matched_rows.len(),
                criteria.branch,
                criteria.range
            );
            println!("  {}", paths.filtered.display());
            println!("  {}", paths.summary.display());
        }
        Commands::Generate { ref out, seed } => {
            generate(out, seed)?;
        }
    }

    Ok(())
}

fn open(cli: &Cli, data: &Path) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let loader = settings::loader_config(cli.delimiter, cli.clamp_billed)?;
    let config = settings::load_dashboard_config(cli.config.as_deref())?;
    Ok(Dashboard::open_with(data, &loader, config)?)
}

fn print_dimensions(dashboard: &Dashboard) {
    let dims = dashboard.table().dimensions();
    let join = |values: &std::collections::BTreeSet<String>| {
        values.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    println!("Rows:     {}", dashboard.table().len());
    println!("Branches: {}", join(&dims.branches));
    println!("Segments: {}", join(&dims.segments));
    println!("Channels: {}", join(&dims.channels));
    let months = dims
        .period_bounds
        .map_or_else(|| "none".to_string(), |(first, last)| format!("{first} to {last}"));
    println!("Months:   {months}");
}

fn print_report(
    report: &DashboardReport<'_>,
    format: ReportFormat,
    rows: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = KpiSummary::from_report(report);

    match format {
        ReportFormat::Json => {
            let envelope = ReportBuilder::from_dashboard(report)?.build()?;
            println!("{}", envelope.to_json()?);
        }
        ReportFormat::Text => {
            print!("{}", summary.to_ascii_table());
            if !report.is_empty() {
                for table in BreakdownTable::all(report) {
                    print!("{}", table.to_ascii_table());
                }
                print!("{}", RowPreview::from_report(report, rows).to_ascii_table());
            }
        }
        ReportFormat::Markdown => {
            print!("{}", summary.to_markdown());
            if !report.is_empty() {
                println!();
                for table in BreakdownTable::all(report) {
                    print!("{}", table.to_markdown());
                }
                print!("{}", RowPreview::from_report(report, rows).to_markdown());
            }
        }
    }

    Ok(())
}

fn generate(out: &Path, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = SyntheticConfig::default();
    let config = SyntheticConfig {
        seed: seed.unwrap_or(defaults.seed),
        ..defaults
    };

    let records = synthetic::generate(&config);
    synthetic::write_csv(&records, out)?;
    println!("Wrote {} rows to {}", records.len(), out.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_args() {
        let cli = Cli::try_parse_from([
            "salesboard",
            "report",
            "--data",
            "ventas.csv",
            "--segment",
            "TRADICIONAL",
            "--segment",
            "OTROS",
            "--from",
            "2024-01",
            "--format",
            "markdown",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Report {
                filters, format, ..
            } => {
                assert_eq!(filters.segments, vec!["TRADICIONAL", "OTROS"]);
                assert_eq!(filters.from.map(|m| m.to_string()).as_deref(), Some("2024-01"));
                assert_eq!(format, ReportFormat::Markdown);
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_rejects_bad_month() {
        let result = Cli::try_parse_from([
            "salesboard",
            "report",
            "--data",
            "ventas.csv",
            "--to",
            "May",
        ]);
        assert!(result.is_err());
    }
}
