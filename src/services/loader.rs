//! Statement loader
//!
//! Reads a bank statement export (CSV or spreadsheet), infers which column
//! holds which field from the header row, and parses every data row into a
//! typed [`StatementRow`]. Rows that cannot be parsed are skipped with a
//! warning; only a missing file, an unknown format or missing required
//! columns abort the load.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Datelike, Duration, NaiveDate};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{ReportError, ReportResult};
use crate::models::Money;

/// How many leading rows are searched for the header (bank exports often
/// start with account details)
const HEADER_SEARCH_ROWS: usize = 20;

/// Date formats tried after the configured one
const FALLBACK_DATE_FORMATS: [&str; 5] =
    ["%d/%m/%Y", "%d/%m/%y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Earliest (year, month) accepted. Earlier text dates are usually a misread
/// two-digit year, and Excel serials before March 1900 are off by one day
/// because of its phantom 1900-02-29.
const FIRST_SUPPORTED_MONTH: (i32, u32) = (1900, 3);

/// Excel serial of 1900-03-01
const MIN_EXCEL_SERIAL: f64 = 61.0;

/// Excel serial of 9999-12-31, the last date Excel can represent
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Input file kind, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Csv,
    Spreadsheet,
}

impl StatementFormat {
    /// Pick the reader for a path
    pub fn from_path(path: &Path) -> ReportResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(ReportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A single cell as read from the statement, before interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Build a text cell, collapsing blank strings to `Empty`
    pub fn text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Cell content as a string (numbers rendered plainly)
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Date(d) => Some(d.format("%d/%m/%Y").to_string()),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::text(s),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
                .map(Cell::Date)
                .unwrap_or(Cell::Empty),
            Data::DateTimeIso(s) => s
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .map(Cell::Date)
                .unwrap_or_else(|| Cell::text(s)),
            other => Cell::text(&other.to_string()),
        }
    }
}

/// Convert an Excel serial day number to a date
///
/// Excel's epoch is 1899-12-30 once its 1900 leap year bug is accounted for.
/// Serials outside 1900-03-01..=9999-12-31 (account numbers in a date
/// column, say) are rejected.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(MIN_EXCEL_SERIAL..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Column roles inferred from the statement header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Booking date ("Data contabile")
    pub date_column: Option<usize>,
    /// Value date ("Valuta")
    pub value_date_column: Option<usize>,
    /// Outflow column ("Dare")
    pub debit_column: Option<usize>,
    /// Inflow column ("Avere")
    pub credit_column: Option<usize>,
    /// Single signed amount column, for statements without debit/credit
    pub amount_column: Option<usize>,
    /// Description ("Descrizione")
    pub description_column: Option<usize>,
    /// Bank-assigned category ("Categoria")
    pub category_column: Option<usize>,
    /// Free-form tag
    pub tag_column: Option<usize>,
}

impl ColumnMapping {
    /// Detect column roles from header names
    ///
    /// Matching is case-insensitive and keyword based so that both the
    /// Italian bank headers and their English equivalents are recognised.
    /// Columns nothing matches ("Divisa", "Causale", ...) are ignored.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut mapping = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let h = header
                .as_ref()
                .trim_start_matches('\u{feff}')
                .trim()
                .to_lowercase();
            let h = h.as_str();

            if h.is_empty() {
                continue;
            }

            if h.contains("valuta") || h.contains("value date") {
                mapping.value_date_column.get_or_insert(idx);
            } else if h.contains("data") || h.contains("date") {
                mapping.date_column.get_or_insert(idx);
            } else if h == "dare"
                || h.contains("debit")
                || h.contains("uscit")
                || h.contains("withdrawal")
                || h.contains("outflow")
            {
                mapping.debit_column.get_or_insert(idx);
            } else if h == "avere"
                || h.contains("credit")
                || h.contains("entrat")
                || h.contains("deposit")
                || h.contains("inflow")
            {
                mapping.credit_column.get_or_insert(idx);
            } else if h.contains("importo") || h.contains("amount") {
                mapping.amount_column.get_or_insert(idx);
            } else if h.contains("descrizione")
                || h.contains("description")
                || h.contains("payee")
                || h.contains("memo")
            {
                mapping.description_column.get_or_insert(idx);
            } else if h.contains("categoria") || h.contains("category") {
                mapping.category_column.get_or_insert(idx);
            } else if h == "tag" || h == "tags" {
                mapping.tag_column.get_or_insert(idx);
            }
        }

        // With separate debit/credit columns the single amount is ignored
        if mapping.has_split_amounts() {
            mapping.amount_column = None;
        }

        mapping
    }

    /// Whether debit and credit come from separate columns
    pub fn has_split_amounts(&self) -> bool {
        self.debit_column.is_some() && self.credit_column.is_some()
    }

    /// Ensure every required column was found
    pub fn validate(&self) -> ReportResult<()> {
        if self.date_column.is_none() {
            return Err(ReportError::MissingColumn("booking date"));
        }
        if self.description_column.is_none() {
            return Err(ReportError::MissingColumn("description"));
        }
        if !self.has_split_amounts() && self.amount_column.is_none() {
            return Err(ReportError::MissingColumn("debit/credit or amount"));
        }
        Ok(())
    }
}

/// A parsed statement row, before debit and credit are merged
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    /// 1-based row number in the source file
    pub row_number: usize,
    pub date: NaiveDate,
    pub value_date: Option<NaiveDate>,
    pub description: String,
    pub debit: Option<Money>,
    pub credit: Option<Money>,
    pub amount: Option<Money>,
    pub bank_category: Option<String>,
    pub tag: Option<String>,
}

/// A row left out of the ledger, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub row_number: usize,
    pub reason: String,
}

impl From<ReportError> for RowIssue {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Parse { row, message } => Self {
                row_number: row,
                reason: message,
            },
            other => Self {
                row_number: 0,
                reason: other.to_string(),
            },
        }
    }
}

/// Result of loading a statement
#[derive(Debug, Clone)]
pub struct LoadedStatement {
    /// Rows that parsed cleanly, in file order
    pub rows: Vec<StatementRow>,
    /// Rows skipped because they could not be parsed
    pub skipped: Vec<RowIssue>,
    /// Column roles used
    pub mapping: ColumnMapping,
}

/// Reads statements using the regional format from settings
pub struct StatementLoader<'a> {
    settings: &'a Settings,
}

impl<'a> StatementLoader<'a> {
    /// Create a new loader
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Load a statement file, picking the reader from its extension
    pub fn load(&self, path: &Path) -> ReportResult<LoadedStatement> {
        let format = StatementFormat::from_path(path)?;
        if !path.exists() {
            return Err(ReportError::Io(format!(
                "Statement not found: {}",
                path.display()
            )));
        }

        info!(path = %path.display(), ?format, "loading statement");
        match format {
            StatementFormat::Csv => {
                let file = std::fs::File::open(path).map_err(|e| {
                    ReportError::Io(format!("Failed to open {}: {}", path.display(), e))
                })?;
                self.load_csv_from_reader(file)
            }
            StatementFormat::Spreadsheet => self.load_spreadsheet(path),
        }
    }

    /// Load CSV data from any reader
    pub fn load_csv_from_reader<R: Read>(&self, reader: R) -> ReportResult<LoadedStatement> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.settings.csv_delimiter as u8)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut unreadable = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            match result {
                Ok(record) => {
                    let row_number = record
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(idx + 1);
                    let cells = record.iter().map(Cell::text).collect();
                    records.push((row_number, cells));
                }
                Err(e) => {
                    let row_number = e
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(idx + 1);
                    unreadable.push(RowIssue {
                        row_number,
                        reason: format!("Unreadable CSV record: {}", e),
                    });
                }
            }
        }

        let mut loaded = self.parse_records(records)?;
        for issue in unreadable {
            warn!(row = issue.row_number, reason = %issue.reason, "skipping row");
            loaded.skipped.push(issue);
        }
        loaded.skipped.sort_by_key(|i| i.row_number);
        Ok(loaded)
    }

    /// Load the first worksheet of a spreadsheet
    fn load_spreadsheet(&self, path: &Path) -> ReportResult<LoadedStatement> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ReportError::Spreadsheet("Workbook has no worksheets".into()))??;

        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let records = range
            .rows()
            .enumerate()
            .map(|(idx, row)| (first_row + idx + 1, row.iter().map(Cell::from).collect()))
            .collect();

        self.parse_records(records)
    }

    /// Locate the header, infer the mapping, and parse every row after it
    fn parse_records(&self, records: Vec<(usize, Vec<Cell>)>) -> ReportResult<LoadedStatement> {
        let (header_idx, mapping) = find_header(&records)?;
        debug!(?mapping, header_row = records[header_idx].0, "detected columns");

        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        for (row_number, cells) in records.into_iter().skip(header_idx + 1) {
            if cells.iter().all(Cell::is_empty) {
                continue;
            }

            match self.parse_row(row_number, &cells, &mapping) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(row = row_number, error = %e, "skipping unparseable row");
                    skipped.push(RowIssue::from(e));
                }
            }
        }

        info!(rows = rows.len(), skipped = skipped.len(), "statement loaded");
        Ok(LoadedStatement {
            rows,
            skipped,
            mapping,
        })
    }

    /// Parse a single data row
    fn parse_row(
        &self,
        row_number: usize,
        cells: &[Cell],
        mapping: &ColumnMapping,
    ) -> ReportResult<StatementRow> {
        let cell = |col: Option<usize>| cell_at(cells, col);
        let row_err = |message: String| ReportError::parse(row_number, message);

        let date = self
            .parse_date(cell(mapping.date_column))
            .map_err(row_err)?
            .ok_or_else(|| row_err("Missing booking date".to_string()))?;

        let value_date = self
            .parse_date(cell(mapping.value_date_column))
            .map_err(row_err)?;

        let description = cell(mapping.description_column)
            .as_string()
            .unwrap_or_default();

        let debit = parse_money(cell(mapping.debit_column)).map_err(row_err)?;
        let credit = parse_money(cell(mapping.credit_column)).map_err(row_err)?;
        let amount = parse_money(cell(mapping.amount_column)).map_err(row_err)?;

        Ok(StatementRow {
            row_number,
            date,
            value_date,
            description,
            debit,
            credit,
            amount,
            bank_category: cell(mapping.category_column).as_string(),
            tag: cell(mapping.tag_column).as_string(),
        })
    }

    /// Parse a date cell; `Ok(None)` for an empty cell
    fn parse_date(&self, cell: &Cell) -> Result<Option<NaiveDate>, String> {
        match cell {
            Cell::Empty => Ok(None),
            Cell::Date(d) => Ok(Some(*d)),
            Cell::Number(serial) => excel_serial_to_date(*serial)
                .map(Some)
                .ok_or_else(|| format!("Could not parse date serial: {}", serial)),
            Cell::Text(s) => {
                // Spreadsheet exports sometimes append a midnight time
                let s = s.split_whitespace().next().unwrap_or("");
                std::iter::once(self.settings.date_format.as_str())
                    .chain(FALLBACK_DATE_FORMATS)
                    .filter_map(|format| NaiveDate::parse_from_str(s, format).ok())
                    // "%Y" happily reads "25" as year 25
                    .find(|d| (d.year(), d.month()) >= FIRST_SUPPORTED_MONTH)
                    .map(Some)
                    .ok_or_else(|| format!("Could not parse date: '{}'", s))
            }
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Cell at a mapped column; short records read as empty
fn cell_at(cells: &[Cell], col: Option<usize>) -> &Cell {
    col.and_then(|c| cells.get(c)).unwrap_or(&EMPTY_CELL)
}

/// Parse a money cell; `Ok(None)` for an empty cell
fn parse_money(cell: &Cell) -> Result<Option<Money>, String> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Money::try_from_f64(*n)
            .map(Some)
            .ok_or_else(|| format!("Could not parse amount: {} is out of range", n)),
        Cell::Text(s) => Money::parse_regional(s)
            .map(Some)
            .map_err(|e| format!("Could not parse amount: {}", e)),
        Cell::Date(d) => Err(format!("Expected an amount, found date {}", d)),
    }
}

/// Find the first row whose cells form a complete header
fn find_header(records: &[(usize, Vec<Cell>)]) -> ReportResult<(usize, ColumnMapping)> {
    let mut first_error = None;

    for (idx, (_, cells)) in records.iter().enumerate().take(HEADER_SEARCH_ROWS) {
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        let names: Vec<String> = cells
            .iter()
            .map(|c| c.as_string().unwrap_or_default())
            .collect();
        let mapping = ColumnMapping::detect(&names);
        match mapping.validate() {
            Ok(()) => return Ok((idx, mapping)),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(first_error.unwrap_or(ReportError::MissingColumn("header row")))
}
