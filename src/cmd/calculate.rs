//! Calculate command - income tax on a salary for one tax year

use super::format::{format_amount, format_gbp, format_gbp_whole, format_label, format_rate};
use super::schema::CsvField;
use super::{resolve_year, year_config, RatesArgs};
use crate::core::{calculate_tax, AllowanceStatus, BandLabel, TaxCalculation, TaxYearConfig};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use sitax_derive::CsvSchema;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Annual gross salary in pounds
    #[arg(allow_hyphen_values = true)]
    salary: Decimal,

    /// Tax year (e.g., 2025-2026). Defaults to the current tax year
    #[arg(short, long)]
    year: Option<String>,

    #[command(flatten)]
    rates: RatesArgs,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the band breakdown as CSV
    #[arg(long)]
    csv: bool,
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = self.rates.load()?;
        let year = resolve_year(&table, self.year.as_deref());
        let config = year_config(&table, &year)?;

        if self.salary.is_zero() && !self.json && !self.csv {
            println!("Please enter a salary to calculate the tax.");
            return Ok(());
        }

        let result = calculate_tax(self.salary, config)?;

        if self.json {
            print_json(&year, config, &result)
        } else if self.csv {
            write_csv(&result, io::stdout())
        } else {
            print_summary(&year, config, &result);
            Ok(())
        }
    }
}

/// Row for the breakdown table
#[derive(Debug, Clone, Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Taxable")]
    taxable_amount: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

/// CSV record for one breakdown entry
#[derive(Debug, Clone, Serialize, CsvSchema)]
pub struct BreakdownRecord {
    /// Lowest gross salary taxed in the band
    pub salary_from: String,
    /// Highest gross salary taxed in the band (empty for the top rate)
    pub salary_to: Option<String>,
    /// Taxable income falling in the band
    #[serde(rename = "taxable_gbp")]
    pub taxable_amount: String,
    /// Marginal rate as a decimal fraction
    pub rate: String,
    /// Tax for the band, rounded to pence
    #[serde(rename = "tax_gbp")]
    pub tax: String,
}

impl From<&crate::core::BandTax> for BreakdownRecord {
    fn from(entry: &crate::core::BandTax) -> Self {
        let (salary_from, salary_to) = match entry.label {
            BandLabel::Range { from, to } => (from, Some(to)),
            BandLabel::Above(from) => (from, None),
        };
        BreakdownRecord {
            salary_from: salary_from.normalize().to_string(),
            salary_to: salary_to.map(|to| to.normalize().to_string()),
            taxable_amount: entry.taxable_amount.normalize().to_string(),
            rate: entry.rate.normalize().to_string(),
            tax: format_amount(entry.tax),
        }
    }
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct CalculationOutput {
    tax_year: String,
    salary: String,
    personal_allowance: String,
    allowance_status: &'static str,
    allowance_cliff: String,
    taxable_income: String,
    breakdown: Vec<BandOutput>,
    total_tax: String,
    take_home: String,
    effective_rate_pct: String,
}

#[derive(Debug, Serialize)]
struct BandOutput {
    label: String,
    taxable_amount: String,
    rate_pct: String,
    tax: String,
}

pub fn allowance_status_name(status: AllowanceStatus) -> &'static str {
    match status {
        AllowanceStatus::Full => "full",
        AllowanceStatus::Tapered => "tapered",
        AllowanceStatus::Withdrawn => "withdrawn",
    }
}

/// Explanation shown next to the personal allowance
pub fn allowance_note(config: &TaxYearConfig, salary: Decimal) -> Option<String> {
    match config.allowance_status(salary) {
        AllowanceStatus::Full => None,
        AllowanceStatus::Tapered => Some(format!(
            "tapered: £1 lost for every £2 above {}",
            format_gbp_whole(config.allowance_threshold)
        )),
        AllowanceStatus::Withdrawn => Some(format!(
            "withdrawn from {}",
            format_gbp_whole(config.allowance_cliff())
        )),
    }
}

fn print_summary(year: &str, config: &TaxYearConfig, result: &TaxCalculation) {
    println!();
    println!("TAX CALCULATION SUMMARY ({})", year);
    println!();
    println!("  Annual Salary:       {}", format_gbp(result.salary));
    match allowance_note(config, result.salary) {
        Some(note) => println!(
            "  Personal Allowance:  {} ({})",
            format_gbp(result.personal_allowance),
            note
        ),
        None => println!(
            "  Personal Allowance:  {}",
            format_gbp(result.personal_allowance)
        ),
    }
    println!("  Taxable Income:      {}", format_gbp(result.taxable_income));
    println!();

    println!("BREAKDOWN BY TAX BAND");
    if result.breakdown.is_empty() {
        println!("  No tax due.");
    } else {
        let rows: Vec<BreakdownRow> = result
            .breakdown
            .iter()
            .map(|entry| BreakdownRow {
                band: format_label(&entry.label),
                taxable_amount: format_gbp(entry.taxable_amount),
                rate: format_rate(entry.rate),
                tax: format_gbp(entry.tax),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!();

    println!("TOTAL INCOME TAX: {}", format_gbp(result.total_tax));
    println!("Take-home pay (pre-NI): {}", format_gbp(result.take_home()));
    println!();
}

fn print_json(year: &str, config: &TaxYearConfig, result: &TaxCalculation) -> anyhow::Result<()> {
    let output = CalculationOutput {
        tax_year: year.to_string(),
        salary: format_amount(result.salary),
        personal_allowance: format_amount(result.personal_allowance),
        allowance_status: allowance_status_name(config.allowance_status(result.salary)),
        allowance_cliff: format_amount(config.allowance_cliff()),
        taxable_income: format_amount(result.taxable_income),
        breakdown: result
            .breakdown
            .iter()
            .map(|entry| BandOutput {
                label: entry.label.to_string(),
                taxable_amount: format_amount(entry.taxable_amount),
                rate_pct: format!("{}", (entry.rate * dec!(100)).normalize()),
                tax: format_amount(entry.tax),
            })
            .collect(),
        total_tax: format_amount(result.total_tax),
        take_home: format_amount(result.take_home()),
        effective_rate_pct: format_amount(result.effective_rate() * dec!(100)),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn write_csv<W: io::Write>(result: &TaxCalculation, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(BreakdownRecord::csv_header())?;
    for entry in &result.breakdown {
        wtr.serialize(BreakdownRecord::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;

    fn calculation(salary: Decimal) -> TaxCalculation {
        RateTable::builtin()
            .unwrap()
            .calculate(salary, "2025-2026")
            .unwrap()
    }

    #[test]
    fn csv_has_header_and_one_row_per_band() {
        let mut out = Vec::new();
        write_csv(&calculation(dec!(150000)), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "salary_from,salary_to,taxable_gbp,rate,tax_gbp");
        assert_eq!(lines[1], "1,15397,15397,0.19,2925.43");
        assert_eq!(lines[6], "125140,,24860,0.48,11932.80");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn csv_for_no_tax_is_header_only() {
        let mut out = Vec::new();
        write_csv(&calculation(dec!(0)), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().trim_end(),
            "salary_from,salary_to,taxable_gbp,rate,tax_gbp"
        );
    }

    #[test]
    fn allowance_notes_use_derived_cliff() {
        let table = RateTable::builtin().unwrap();
        let config = table.get("2025-2026").unwrap();

        assert_eq!(allowance_note(config, dec!(100000)), None);
        assert_eq!(
            allowance_note(config, dec!(110000)).as_deref(),
            Some("tapered: £1 lost for every £2 above £100,000")
        );
        assert_eq!(
            allowance_note(config, dec!(125140)).as_deref(),
            Some("withdrawn from £125,140")
        );
    }
}
