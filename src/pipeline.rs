//! End-to-end run: load, normalize, categorize, aggregate, write.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::ReportResult;
use crate::export::XlsxReporter;
use crate::reports::StatementReport;
use crate::services::{normalize, Categorizer, RowIssue, StatementLoader};

/// What a run produced
#[derive(Debug)]
pub struct RunSummary {
    /// Workbook that was written
    pub output: PathBuf,
    /// Rows skipped by the loader
    pub skipped: Vec<RowIssue>,
    /// Rows dropped by the normalizer
    pub dropped: Vec<RowIssue>,
    /// The aggregated report
    pub report: StatementReport,
}

impl RunSummary {
    /// Number of transactions in the ledger
    pub fn transaction_count(&self) -> usize {
        self.report.ledger.len()
    }

    /// Rows that did not make it into the ledger
    pub fn rejected_count(&self) -> usize {
        self.skipped.len() + self.dropped.len()
    }
}

/// Build the report for a statement without writing anything
pub fn analyze(
    input: &Path,
    settings: &Settings,
) -> ReportResult<(StatementReport, Vec<RowIssue>, Vec<RowIssue>)> {
    let loaded = StatementLoader::new(settings).load(input)?;
    let normalized = normalize(loaded.rows);
    let ledger = Categorizer::from_settings(settings).apply(normalized.ledger);

    if ledger.is_empty() {
        warn!(path = %input.display(), "statement produced no transactions");
    }

    let report = StatementReport::build(ledger, settings);
    Ok((report, loaded.skipped, normalized.dropped))
}

/// Process `input` and write the workbook to `output`
pub fn run(input: &Path, output: &Path, settings: &Settings) -> ReportResult<RunSummary> {
    let (report, skipped, dropped) = analyze(input, settings)?;

    XlsxReporter::new().write(&report, output)?;

    info!(
        transactions = report.ledger.len(),
        skipped = skipped.len(),
        dropped = dropped.len(),
        output = %output.display(),
        "run complete"
    );

    Ok(RunSummary {
        output: output.to_path_buf(),
        skipped,
        dropped,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use tempfile::TempDir;

    const STATEMENT: &str = "\
Data contabile,Valuta,Dare,Avere,Divisa,Causale,Descrizione,Categoria,Tag
12/03/2025,12/03/2025,\"-100,00\",,EUR,POS,Pagamento POS Ristorante Da Mario,Ristoranti,
12/03/2025,12/03/2025,\"-30,00\",,EUR,POS,Pagamento POS Cinema,Cultura,
11/03/2025,11/03/2025,\"-11,50\",,EUR,SDD,Addebito diretto Enel,Utenze,casa
01/04/2025,01/04/2025,,\"2.500,00\",EUR,BON,Stipendio marzo,Stipendio,
02/04/2025,02/04/2025,\"-5,00\",\"5,00\",EUR,???,Riga ambigua,,
bad date,02/04/2025,\"-5,00\",,EUR,POS,Riga illeggibile,,
";

    fn write_statement(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("statement.csv");
        std::fs::write(&path, STATEMENT).unwrap();
        path
    }

    #[test]
    fn test_run_writes_workbook_and_counts() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_statement(&temp_dir);
        let output = temp_dir.path().join("report.xlsx");

        let summary = run(&input, &output, &Settings::default()).unwrap();

        assert!(output.exists());
        assert_eq!(summary.transaction_count(), 4);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.dropped.len(), 1);
        assert_eq!(summary.rejected_count(), 2);
        assert_eq!(summary.report.stats.total_income.cents(), 250000);
        assert_eq!(summary.report.stats.total_expenses.cents(), -14150);
    }

    #[test]
    fn test_ledger_is_chronological_and_categorized() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_statement(&temp_dir);

        let (report, _, _) = analyze(&input, &Settings::default()).unwrap();
        let first = &report.ledger.transactions()[0];

        assert_eq!(first.description, "Addebito diretto Enel");
        assert_eq!(first.category.as_deref(), Some("Utilities"));
        assert_eq!(first.tag.as_deref(), Some("casa"));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let result = run(
            &temp_dir.path().join("missing.csv"),
            &temp_dir.path().join("out.xlsx"),
            &Settings::default(),
        );
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
