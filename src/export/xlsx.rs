//! Excel workbook export
//!
//! Writes the statement report as an `.xlsx` workbook: one sheet per report
//! plus a `Charts` sheet with native Excel charts built from those sheets.
//! Any existing file at the output path is overwritten.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Chart, ChartDataLabel, ChartType, Format, Workbook, Worksheet};
use tracing::{debug, info};

use crate::error::ReportResult;
use crate::reports::{BreakdownEntry, StatValue, StatementReport};

pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const MONTHLY_SHEET: &str = "Monthly Summary";
pub const CATEGORY_SHEET: &str = "Category Summary";
pub const INCOME_SHEET: &str = "Income Sources";
pub const SUMMARY_SHEET: &str = "Summary";
pub const CHARTS_SHEET: &str = "Charts";

/// Days between 0001-01-01 (day 1 of the common era) and Excel's epoch
const EXCEL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// Chart anchors on the Charts sheet (row, column)
const TREND_CHART_AT: (u32, u16) = (0, 0);
const EXPENSE_PIE_AT: (u32, u16) = (20, 0);
const INCOME_PIE_AT: (u32, u16) = (20, 9);
const CATEGORY_BAR_AT: (u32, u16) = (40, 0);

/// Convert a date to an Excel serial day number
///
/// Exact from 1900-03-01 on; the loader rejects anything earlier.
pub fn date_to_excel_serial(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - EXCEL_EPOCH_DAYS_FROM_CE)
}

/// Cell formats shared by every sheet
struct Formats {
    header: Format,
    money: Format,
    date: Format,
    title: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            money: Format::new().set_num_format("#,##0.00"),
            date: Format::new().set_num_format("dd/mm/yyyy"),
            title: Format::new().set_bold().set_font_size(12),
        }
    }
}

/// Location of a chart's data table on the Summary sheet (inclusive rows)
#[derive(Debug, Clone, Copy)]
struct TableRows {
    first: u32,
    last: u32,
}

/// Where the pie chart tables ended up
#[derive(Debug, Clone, Copy, Default)]
struct SummaryLayout {
    top_expenses: Option<TableRows>,
    top_income: Option<TableRows>,
}

/// Writes a [`StatementReport`] to an Excel workbook
#[derive(Default)]
pub struct XlsxReporter;

impl XlsxReporter {
    pub fn new() -> Self {
        Self
    }

    /// Build the workbook and save it, replacing any existing file
    pub fn write(&self, report: &StatementReport, path: &Path) -> ReportResult<()> {
        if path.exists() {
            info!(path = %path.display(), "overwriting existing report");
        }

        let mut workbook = self.build(report)?;
        workbook.save(path)?;

        info!(path = %path.display(), "report written");
        Ok(())
    }

    /// Build the in-memory workbook
    pub fn build(&self, report: &StatementReport) -> ReportResult<Workbook> {
        let formats = Formats::new();
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(TRANSACTIONS_SHEET)?;
        write_transactions(sheet, report, &formats)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name(MONTHLY_SHEET)?;
        write_monthly(sheet, report, &formats)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name(CATEGORY_SHEET)?;
        write_categories(sheet, report, &formats)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name(INCOME_SHEET)?;
        write_income_sources(sheet, report, &formats)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        let layout = write_summary(sheet, report, &formats)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name(CHARTS_SHEET)?;
        write_charts(sheet, report, layout)?;

        debug!(transactions = report.ledger.len(), "workbook built");
        Ok(workbook)
    }
}

fn write_header(
    sheet: &mut Worksheet,
    row: u32,
    headers: &[&str],
    format: &Format,
) -> ReportResult<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, format)?;
    }
    Ok(())
}

fn write_optional_string(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> ReportResult<()> {
    if let Some(value) = value {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

fn write_transactions(
    sheet: &mut Worksheet,
    report: &StatementReport,
    formats: &Formats,
) -> ReportResult<()> {
    write_header(
        sheet,
        0,
        &[
            "Date",
            "Value Date",
            "Description",
            "Amount",
            "Type",
            "Category",
            "Bank Category",
            "Tag",
            "Month",
        ],
        &formats.header,
    )?;

    for (idx, txn) in report.ledger.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number_with_format(row, 0, date_to_excel_serial(txn.date), &formats.date)?;
        if let Some(value_date) = txn.value_date {
            let serial = date_to_excel_serial(value_date);
            sheet.write_number_with_format(row, 1, serial, &formats.date)?;
        }
        sheet.write_string(row, 2, txn.description.as_str())?;
        sheet.write_number_with_format(row, 3, txn.amount.to_f64(), &formats.money)?;
        sheet.write_string(row, 4, txn.source.to_string())?;
        sheet.write_string(row, 5, txn.category_or(&report.uncategorized_label))?;
        write_optional_string(sheet, row, 6, txn.bank_category.as_deref())?;
        write_optional_string(sheet, row, 7, txn.tag.as_deref())?;
        sheet.write_string(row, 8, txn.month().to_string())?;
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 12)?;
    sheet.set_column_width(2, 40)?;
    sheet.set_column_width(3, 14)?;
    sheet.set_column_width(5, 20)?;
    sheet.set_column_width(6, 20)?;
    Ok(())
}

fn write_monthly(
    sheet: &mut Worksheet,
    report: &StatementReport,
    formats: &Formats,
) -> ReportResult<()> {
    write_header(
        sheet,
        0,
        &["Month", "Income", "Expenses", "Net", "Transactions", "Balance"],
        &formats.header,
    )?;

    for (idx, m) in report.monthly.months.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, m.month.to_string())?;
        sheet.write_number_with_format(row, 1, m.income.to_f64(), &formats.money)?;
        sheet.write_number_with_format(row, 2, m.expenses.to_f64(), &formats.money)?;
        sheet.write_number_with_format(row, 3, m.net.to_f64(), &formats.money)?;
        sheet.write_number(row, 4, m.transaction_count as f64)?;
        sheet.write_number_with_format(row, 5, m.balance.to_f64(), &formats.money)?;
    }

    sheet.set_column_width(0, 10)?;
    for col in 1..=5 {
        sheet.set_column_width(col, 14)?;
    }
    Ok(())
}

fn write_categories(
    sheet: &mut Worksheet,
    report: &StatementReport,
    formats: &Formats,
) -> ReportResult<()> {
    write_header(sheet, 0, &["Category", "Total", "Transactions"], &formats.header)?;

    for (idx, c) in report.categories.categories.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, c.category.as_str())?;
        sheet.write_number_with_format(row, 1, c.total.to_f64(), &formats.money)?;
        sheet.write_number(row, 2, c.transaction_count as f64)?;
    }

    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 14)?;
    Ok(())
}

fn write_income_sources(
    sheet: &mut Worksheet,
    report: &StatementReport,
    formats: &Formats,
) -> ReportResult<()> {
    write_header(sheet, 0, &["Source", "Total", "Transactions"], &formats.header)?;
    write_breakdown_rows(sheet, 1, report.income_sources.sources(), formats)?;

    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 14)?;
    Ok(())
}

/// Write category/total/count rows starting at `first_row`, returning the rows used
fn write_breakdown_rows(
    sheet: &mut Worksheet,
    first_row: u32,
    entries: &[BreakdownEntry],
    formats: &Formats,
) -> ReportResult<Option<TableRows>> {
    for (idx, e) in entries.iter().enumerate() {
        let row = first_row + idx as u32;
        sheet.write_string(row, 0, e.category.as_str())?;
        sheet.write_number_with_format(row, 1, e.total.to_f64(), &formats.money)?;
        sheet.write_number(row, 2, e.transaction_count as f64)?;
    }

    Ok((!entries.is_empty()).then(|| TableRows {
        first: first_row,
        last: first_row + entries.len() as u32 - 1,
    }))
}

fn write_summary(
    sheet: &mut Worksheet,
    report: &StatementReport,
    formats: &Formats,
) -> ReportResult<SummaryLayout> {
    write_header(sheet, 0, &["Metric", "Value"], &formats.header)?;

    let rows = report.stats.rows();
    for (idx, (metric, value)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *metric)?;
        match value {
            StatValue::Amount(m) => {
                sheet.write_number_with_format(row, 1, m.to_f64(), &formats.money)?;
            }
            StatValue::Count(n) => {
                sheet.write_number(row, 1, *n as f64)?;
            }
            StatValue::Text(s) => {
                sheet.write_string(row, 1, s.as_str())?;
            }
        }
    }

    let n = report.top_categories;
    let mut layout = SummaryLayout::default();

    // Pie chart data, one blank row after the metrics
    let mut row = rows.len() as u32 + 2;
    sheet.write_string_with_format(row, 0, "Top Expense Categories", &formats.title)?;
    write_header(sheet, row + 1, &["Category", "Amount", "Transactions"], &formats.header)?;
    layout.top_expenses = write_breakdown_rows(sheet, row + 2, report.expenses.top(n), formats)?;

    row = layout.top_expenses.map(|t| t.last).unwrap_or(row + 1) + 2;
    sheet.write_string_with_format(row, 0, "Top Income Categories", &formats.title)?;
    write_header(sheet, row + 1, &["Category", "Amount", "Transactions"], &formats.header)?;
    layout.top_income = write_breakdown_rows(
        sheet,
        row + 2,
        report.income_sources.breakdown().top(n),
        formats,
    )?;

    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 16)?;
    Ok(layout)
}

fn write_charts(
    sheet: &mut Worksheet,
    report: &StatementReport,
    layout: SummaryLayout,
) -> ReportResult<()> {
    let months = report.monthly.months.len() as u32;
    if months > 0 {
        let mut chart = Chart::new(ChartType::Line);
        chart
            .add_series()
            .set_name("Balance")
            .set_categories((MONTHLY_SHEET, 1, 0, months, 0))
            .set_values((MONTHLY_SHEET, 1, 5, months, 5));
        chart
            .add_series()
            .set_name("Net")
            .set_categories((MONTHLY_SHEET, 1, 0, months, 0))
            .set_values((MONTHLY_SHEET, 1, 3, months, 3));
        chart.title().set_name("Monthly Balance");
        chart.x_axis().set_name("Month");
        chart.y_axis().set_name("Amount");
        chart.set_width(720).set_height(380);
        sheet.insert_chart(TREND_CHART_AT.0, TREND_CHART_AT.1, &chart)?;
    } else {
        sheet.write_string(TREND_CHART_AT.0, TREND_CHART_AT.1, "No monthly data")?;
    }

    insert_pie(
        sheet,
        EXPENSE_PIE_AT,
        layout.top_expenses,
        "Top Expense Categories",
        "No expense data",
    )?;
    insert_pie(
        sheet,
        INCOME_PIE_AT,
        layout.top_income,
        "Top Income Categories",
        "No income data",
    )?;

    let categories = report.categories.categories.len() as u32;
    if categories > 0 {
        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_name("Total")
            .set_categories((CATEGORY_SHEET, 1, 0, categories, 0))
            .set_values((CATEGORY_SHEET, 1, 1, categories, 1));
        chart.title().set_name("Totals by Category");
        chart.legend().set_hidden();
        chart.set_width(720).set_height(380);
        sheet.insert_chart(CATEGORY_BAR_AT.0, CATEGORY_BAR_AT.1, &chart)?;
    }

    Ok(())
}

fn insert_pie(
    sheet: &mut Worksheet,
    at: (u32, u16),
    rows: Option<TableRows>,
    title: &str,
    empty_note: &str,
) -> ReportResult<()> {
    let Some(rows) = rows else {
        sheet.write_string(at.0, at.1, empty_note)?;
        return Ok(());
    };

    let mut chart = Chart::new(ChartType::Pie);
    chart
        .add_series()
        .set_name(title)
        .set_categories((SUMMARY_SHEET, rows.first, 0, rows.last, 0))
        .set_values((SUMMARY_SHEET, rows.first, 1, rows.last, 1))
        .set_data_label(ChartDataLabel::new().show_percentage());
    chart.title().set_name(title);
    chart.set_width(480).set_height(380);
    sheet.insert_chart(at.0, at.1, &chart)?;
    Ok(())
}
