//! E2E tests for the sitax command line

use std::process::{Command, Output};

fn sitax(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitax"))
        .args(args)
        .env_remove("SITAX_RATES")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Basic-rate salary shows the summary, bands and totals
#[test]
fn calculate_summary() {
    let output = sitax(&["calculate", "20000", "-y", "2025-2026"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("TAX CALCULATION SUMMARY (2025-2026)"));
    assert!(stdout.contains("£20,000.00"));
    assert!(stdout.contains("£12,570.00"));
    assert!(stdout.contains("£12,571 - £27,967"));
    assert!(stdout.contains("TOTAL INCOME TAX: £1,411.70"));
    assert!(stdout.contains("Take-home pay (pre-NI): £18,588.30"));
}

/// The built-in table only has one year, so it is the default
#[test]
fn calculate_defaults_to_configured_year() {
    let output = sitax(&["calculate", "50000"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("(2025-2026)"));
    assert!(stdout.contains("TOTAL INCOME TAX: £7,431.42"));
}

#[test]
fn calculate_tapered_allowance_note() {
    let output = sitax(&["calculate", "110000", "-y", "2025-2026"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("£7,570.00 (tapered: £1 lost for every £2 above £100,000)"));
    assert!(stdout.contains("TOTAL INCOME TAX: £34,245.60"));
}

#[test]
fn calculate_zero_salary_prompts() {
    let output = sitax(&["calculate", "0"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout(&output).trim(),
        "Please enter a salary to calculate the tax."
    );
}

#[test]
fn calculate_below_allowance_has_no_tax() {
    let output = sitax(&["calculate", "12000"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No tax due."));
    assert!(stdout.contains("TOTAL INCOME TAX: £0.00"));
}

#[test]
fn calculate_json_output() {
    let output = sitax(&["calculate", "100000", "-y", "2025-2026", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["tax_year"], "2025-2026");
    assert_eq!(json["allowance_status"], "full");
    assert_eq!(json["taxable_income"], "87430.00");
    assert_eq!(json["total_tax"], "27495.60");
    assert_eq!(json["allowance_cliff"], "125140.00");

    let breakdown = json["breakdown"].as_array().expect("breakdown array");
    assert_eq!(breakdown.len(), 5);
    assert_eq!(breakdown[4]["label"], "87571 - 137710");
    assert_eq!(breakdown[4]["taxable_amount"], "12430.00");
    assert_eq!(breakdown[4]["tax"], "5593.50");
}

/// Fractional figures round the same way as the text summary
#[test]
fn calculate_json_rounds_like_text() {
    let output = sitax(&["calculate", "112345.67", "-y", "2025-2026", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["personal_allowance"], "6397.17");
    assert_eq!(json["taxable_income"], "105948.51");
    assert_eq!(json["breakdown"][4]["taxable_amount"], "30948.51");
    assert_eq!(json["total_tax"], "35828.93");

    let text = sitax(&["calculate", "112345.67", "-y", "2025-2026"]);
    let text = stdout(&text);
    assert!(text.contains("£6,397.17"));
    assert!(text.contains("£105,948.51"));
}

#[test]
fn calculate_json_zero_salary_is_empty_result() {
    let output = sitax(&["calculate", "0", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["total_tax"], "0.00");
    assert_eq!(json["breakdown"].as_array().map(Vec::len), Some(0));
}

#[test]
fn calculate_csv_output() {
    let output = sitax(&["calculate", "150000", "--csv"]);
    let stdout = stdout(&output);
    let lines: Vec<_> = stdout.lines().collect();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(lines[0], "salary_from,salary_to,taxable_gbp,rate,tax_gbp");
    assert_eq!(lines.last(), Some(&"125140,,24860,0.48,11932.80"));
}

#[test]
fn calculate_json_and_csv_conflict() {
    let output = sitax(&["calculate", "50000", "--json", "--csv"]);
    assert!(!output.status.success());
}

#[test]
fn calculate_negative_salary_fails() {
    let output = sitax(&["calculate", "-5"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("salary must not be negative"));
}

#[test]
fn calculate_unknown_year_fails() {
    let output = sitax(&["calculate", "30000", "-y", "1999-2000"]);
    let stderr = stderr(&output);

    assert!(!output.status.success());
    assert!(stderr.contains("tax year not found: 1999-2000"));
    assert!(stderr.contains("configured tax years: 2025-2026"));
}

/// Extra years from a rates file sit alongside the built-in ones
#[test]
fn calculate_with_extra_rates_file() {
    let output = sitax(&[
        "calculate",
        "80000",
        "-y",
        "2026-2027",
        "--rates",
        "tests/data/rates_2026_2027.json",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("£12,571 - £29,107"));
    assert!(stdout.contains("£56,233 - £87,570"));
    assert!(stdout.contains("TOTAL INCOME TAX: £18,690.95"));
}

#[test]
fn rates_from_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_sitax"))
        .args(["calculate", "40000", "-y", "2026-2027"])
        .env("SITAX_RATES", "tests/data/rates_2026_2027.json")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("TOTAL INCOME TAX: £5,320.63"));
}

/// A year in the rates file replaces the built-in year with the same key
#[test]
fn rates_file_overrides_builtin_year() {
    let output = sitax(&[
        "calculate",
        "30000",
        "-y",
        "2025-2026",
        "--rates",
        "tests/data/flat_override.json",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("£10,001 - £60,000"));
    assert!(stdout.contains("TOTAL INCOME TAX: £4,000.00"));
}

#[test]
fn inconsistent_rates_file_fails() {
    let output = sitax(&[
        "years",
        "--rates",
        "tests/data/bands_not_increasing.json",
    ]);
    let stderr = stderr(&output);

    assert!(!output.status.success());
    assert!(stderr.contains("Failed to load tax rates"));
    assert!(stderr.contains("band 1 upper bound 18000 must exceed 20000"));
}

#[test]
fn missing_rates_file_fails() {
    let output = sitax(&["years", "--rates", "tests/data/does_not_exist.json"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read rate table"));
}

#[test]
fn years_lists_bands() {
    let output = sitax(&["years"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("TAX YEAR 2025-2026 (6 April 2025 to 5 April 2026)"));
    assert!(stdout.contains("Allowance Withdrawn: £125,140"));
    assert!(stdout.contains("£0 - £15,397"));
    assert!(stdout.contains("48%"));
}

#[test]
fn years_json_includes_extra_years() {
    let output = sitax(&[
        "years",
        "--json",
        "--rates",
        "tests/data/rates_2026_2027.json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let years: Vec<_> = json
        .as_array()
        .expect("array of years")
        .iter()
        .map(|year| year["tax_year"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(years, ["2025-2026", "2026-2027"]);
}

#[test]
fn schema_csv_header() {
    let output = sitax(&["schema", "csv-header"]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout(&output).trim(),
        "salary_from,salary_to,taxable_gbp,rate,tax_gbp"
    );
}

#[test]
fn schema_json_describes_rate_file() {
    let output = sitax(&["schema"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"tax_years\""));
    assert!(stdout.contains("\"personal_allowance\""));
}

#[test]
fn html_report_written_to_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("report.html");
    let output = sitax(&[
        "html",
        "50000",
        "-y",
        "2025-2026",
        "-o",
        path.to_str().expect("utf-8 path"),
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("HTML report written to:"));

    let html = std::fs::read_to_string(&path).expect("report written");
    assert!(html.contains("£7,431.42"));
    assert!(html.contains("£42,568.58"));
}
