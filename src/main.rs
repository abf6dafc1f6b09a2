use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use statement_report::cli::{handle_report_command, ReportArgs};

#[derive(Parser)]
#[command(
    name = "statement-report",
    version,
    about = "Turn a bank statement export into an Excel financial report",
    long_about = "statement-report reads a bank's CSV or spreadsheet export, merges the \
                  debit and credit columns into one signed ledger, categorizes each \
                  transaction by keyword and writes an Excel workbook with monthly, \
                  category and income summaries plus charts."
)]
struct Cli {
    #[command(flatten)]
    report: ReportArgs,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    // RUST_LOG wins over the command-line flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    handle_report_command(cli.report).context("Failed to generate report")?;

    Ok(())
}
