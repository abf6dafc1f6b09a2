//! The report command
//!
//! Resolves settings and paths from the command line, runs the pipeline and
//! prints a short summary (plus the statistics tables with `--stats`).

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use crate::config::{ConfigPaths, Settings};
use crate::display::double_separator;
use crate::error::{ReportError, ReportResult};
use crate::pipeline::{self, RunSummary};

/// Arguments of the report command
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Bank statement to read (CSV, XLSX or XLS)
    pub input: Option<PathBuf>,

    /// Workbook to write (default: my_financial_report.xlsx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file (JSON); defaults to $STATEMENT_REPORT_CONFIG, then the
    /// platform config directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print basic statistics and the monthly summary
    #[arg(long)]
    pub stats: bool,

    /// Write a settings file with the defaults (including the rule table) and exit
    #[arg(long, conflicts_with_all = ["input", "output", "stats"])]
    pub init_config: bool,
}

fn config_paths(config: Option<&Path>) -> ReportResult<ConfigPaths> {
    match config {
        Some(path) => Ok(ConfigPaths::for_file(path)),
        None => ConfigPaths::new(),
    }
}

/// Load settings from an explicit file, or the default location
///
/// An explicit file must exist; the default one is optional.
pub fn resolve_settings(config: Option<&Path>) -> ReportResult<Settings> {
    if let Some(path) = config.filter(|p| !p.exists()) {
        return Err(ReportError::Config(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }

    let paths = config_paths(config)?;
    debug!(path = %paths.settings_file().display(), "resolving settings");
    Settings::load_or_default(&paths)
}

/// Write the default settings so the rule table can be edited; never overwrites
pub fn write_default_settings(config: Option<&Path>) -> ReportResult<PathBuf> {
    let paths = config_paths(config)?;
    let path = paths.settings_file();
    if path.exists() {
        return Err(ReportError::Config(format!(
            "Settings file already exists: {}",
            path.display()
        )));
    }

    Settings::default().save(&paths)?;
    Ok(path)
}

/// Handle the report command
pub fn handle_report_command(args: ReportArgs) -> ReportResult<()> {
    if args.init_config {
        let path = write_default_settings(args.config.as_deref())?;
        println!("Default settings written to: {}", path.display());
        return Ok(());
    }

    let settings = resolve_settings(args.config.as_deref())?;

    let input = args
        .input
        .or_else(|| settings.input_file.clone())
        .ok_or_else(|| {
            ReportError::Validation(
                "No statement given: pass an input file or set input_file in the settings".into(),
            )
        })?;
    let output = args.output.unwrap_or_else(|| settings.output_file.clone());

    let summary = pipeline::run(&input, &output, &settings)?;

    println!("Report written to: {}", summary.output.display());
    if let Some((first, last)) = summary.report.ledger.date_range() {
        println!("Period: {} to {}", first.format("%d/%m/%Y"), last.format("%d/%m/%Y"));
    }
    println!(
        "{} transactions, {} rows skipped, {} rows dropped",
        summary.transaction_count(),
        summary.skipped.len(),
        summary.dropped.len()
    );
    for issue in summary.skipped.iter().chain(&summary.dropped) {
        println!("  row {}: {}", issue.row_number, issue.reason);
    }

    if args.stats {
        print_stats(&summary, &settings);
    }

    Ok(())
}

fn print_stats(summary: &RunSummary, settings: &Settings) {
    let report = &summary.report;

    println!();
    println!("Basic Statistics");
    println!("{}", double_separator(40));
    println!("{}", report.stats.format_terminal(&settings.currency_symbol));
    println!();
    print!("{}", report.monthly.format_terminal());
    println!();
    print!("{}", report.income_sources.format_terminal());
}
