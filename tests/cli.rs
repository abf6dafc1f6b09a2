//! End-to-end tests for the statement-report binary

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use calamine::{open_workbook_auto, Data, Reader};
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "\
Data contabile,Valuta,Dare,Avere,Divisa,Causale,Descrizione,Categoria,Tag
12/03/2025,12/03/2025,\"-100,00\",,EUR,POS,Pagamento POS Ristorante Da Mario,Ristoranti,
12/03/2025,12/03/2025,\"-30,00\",,EUR,POS,Pagamento POS Cinema,Cultura,
11/03/2025,11/03/2025,\"-11,50\",,EUR,SDD,Addebito diretto Enel,Utenze,
01/04/2025,01/04/2025,,\"2.500,00\",EUR,BON,Stipendio marzo,Stipendio,
";

fn write_statement(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("statement.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

fn write_empty_settings(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{}").unwrap();
    path
}

fn cmd(settings: &Path) -> Command {
    let mut cmd = Command::cargo_bin("statement-report").unwrap();
    cmd.env_remove("RUST_LOG").arg("--config").arg(settings);
    cmd
}

fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

#[test]
fn writes_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_statement(&temp_dir, STATEMENT);
    let settings = write_empty_settings(&temp_dir);
    let output = temp_dir.path().join("report.xlsx");

    cmd(&settings)
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"))
        .stdout(predicate::str::contains("Period: 11/03/2025 to 01/04/2025"))
        .stdout(predicate::str::contains("4 transactions"));

    let workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec![
            "Transactions",
            "Monthly Summary",
            "Category Summary",
            "Income Sources",
            "Summary",
            "Charts"
        ]
    );

    let categories = sheet_rows(&output, "Category Summary");
    let total: f64 = categories
        .iter()
        .skip(1)
        .filter_map(|r| match r.get(1) {
            Some(Data::Float(f)) => Some(*f),
            _ => None,
        })
        .sum();
    assert!((total - 2358.5).abs() < 1e-9);
}

#[test]
fn rerun_produces_same_contents() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_statement(&temp_dir, STATEMENT);
    let settings = write_empty_settings(&temp_dir);
    let output = temp_dir.path().join("report.xlsx");

    cmd(&settings).arg(&input).arg("-o").arg(&output).assert().success();
    let first = sheet_rows(&output, "Monthly Summary");

    cmd(&settings).arg(&input).arg("-o").arg(&output).assert().success();
    let second = sheet_rows(&output, "Monthly Summary");

    assert_eq!(first, second);
}

#[test]
fn stats_flag_prints_tables() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_statement(&temp_dir, STATEMENT);
    let settings = write_empty_settings(&temp_dir);
    let output = temp_dir.path().join("report.xlsx");

    cmd(&settings)
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Income"))
        .stdout(predicate::str::contains("Restaurants"))
        .stdout(predicate::str::contains("2025-04"));
}

#[test]
fn both_columns_populated_is_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let contents = format!(
        "{}02/04/2025,02/04/2025,\"-5,00\",\"5,00\",EUR,???,Riga ambigua,,\n",
        STATEMENT
    );
    let input = write_statement(&temp_dir, &contents);
    let settings = write_empty_settings(&temp_dir);
    let output = temp_dir.path().join("report.xlsx");

    cmd(&settings)
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 transactions"))
        .stdout(predicate::str::contains("1 rows dropped"));
}

#[test]
fn missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let settings = write_empty_settings(&temp_dir);

    cmd(&settings)
        .arg(temp_dir.path().join("missing.csv"))
        .arg("-o")
        .arg(temp_dir.path().join("report.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Statement not found"));
}

#[test]
fn missing_columns_fail() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_statement(&temp_dir, "Foo,Bar\n1,2\n");
    let settings = write_empty_settings(&temp_dir);

    cmd(&settings)
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("report.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required column"));
}

#[test]
fn unsupported_format_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("statement.pdf");
    std::fs::write(&input, "not a statement").unwrap();
    let settings = write_empty_settings(&temp_dir);

    cmd(&settings)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported"));
}

#[test]
fn input_falls_back_to_settings() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_statement(&temp_dir, STATEMENT);
    let output = temp_dir.path().join("from-settings.xlsx");
    let settings = temp_dir.path().join("settings.json");
    let json = serde_json::json!({
        "input_file": input,
        "output_file": output,
    });
    std::fs::write(&settings, json.to_string()).unwrap();

    cmd(&settings).assert().success();
    assert!(output.exists());
}

#[test]
fn config_from_environment_variable() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_statement(&temp_dir, STATEMENT);
    let output = temp_dir.path().join("from-env.xlsx");
    let settings = temp_dir.path().join("env-settings.json");
    let json = serde_json::json!({ "output_file": output });
    std::fs::write(&settings, json.to_string()).unwrap();

    Command::cargo_bin("statement-report")
        .unwrap()
        .env_remove("RUST_LOG")
        .env("STATEMENT_REPORT_CONFIG", &settings)
        .arg(&input)
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn init_config_writes_defaults_once() {
    let temp_dir = TempDir::new().unwrap();
    let settings = temp_dir.path().join("settings.json");

    cmd(&settings)
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default settings written to"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(written["top_categories"], 5);
    assert!(written["rules"].as_array().is_some_and(|r| !r.is_empty()));

    cmd(&settings)
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
