//! Years command - configured tax years and their rates

use super::format::{format_amount, format_gbp_whole, format_rate};
use super::RatesArgs;
use crate::core::{TaxYear, TaxYearConfig};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct YearsCommand {
    #[command(flatten)]
    rates: RatesArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct BandRow {
    #[tabled(rename = "Taxable Income")]
    taxable: String,
    #[tabled(rename = "Salary (full allowance)")]
    salary: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Serialize)]
struct YearOutput {
    tax_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
    personal_allowance: String,
    allowance_threshold: String,
    allowance_cliff: String,
    bands: Vec<BandOutput>,
    top_rate_pct: String,
}

#[derive(Debug, Serialize)]
struct BandOutput {
    upper_bound: String,
    rate_pct: String,
}

impl YearsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = self.rates.load()?;

        if self.json {
            let years: Vec<YearOutput> = table
                .iter()
                .map(|(year, config)| year_output(year, config))
                .collect();
            println!("{}", serde_json::to_string_pretty(&years)?);
        } else {
            for (year, config) in table.iter() {
                print_year(year, config);
            }
        }
        Ok(())
    }
}

fn year_output(year: &str, config: &TaxYearConfig) -> YearOutput {
    let dates = TaxYear::parse(year);
    YearOutput {
        tax_year: year.to_string(),
        start_date: dates
            .and_then(|ty| ty.start_date())
            .map(|d| d.format("%Y-%m-%d").to_string()),
        end_date: dates
            .and_then(|ty| ty.end_date())
            .map(|d| d.format("%Y-%m-%d").to_string()),
        personal_allowance: format_amount(config.personal_allowance),
        allowance_threshold: format_amount(config.allowance_threshold),
        allowance_cliff: format_amount(config.allowance_cliff()),
        bands: config
            .bands
            .iter()
            .map(|band| BandOutput {
                upper_bound: format_amount(band.upper_bound),
                rate_pct: rate_pct(band.rate),
            })
            .collect(),
        top_rate_pct: rate_pct(config.top_rate),
    }
}

fn rate_pct(rate: Decimal) -> String {
    (rate * Decimal::ONE_HUNDRED).normalize().to_string()
}

/// Band rows with boundaries shown on both scales
fn band_rows(config: &TaxYearConfig) -> Vec<BandRow> {
    let allowance = config.personal_allowance;
    let mut previous = Decimal::ZERO;
    let mut rows = Vec::with_capacity(config.bands.len() + 1);

    for band in &config.bands {
        rows.push(BandRow {
            taxable: format!(
                "{} - {}",
                format_gbp_whole(previous),
                format_gbp_whole(band.upper_bound)
            ),
            salary: format!(
                "{} - {}",
                format_gbp_whole(previous + allowance + Decimal::ONE),
                format_gbp_whole(band.upper_bound + allowance)
            ),
            rate: format_rate(band.rate),
        });
        previous = band.upper_bound;
    }

    rows.push(BandRow {
        taxable: format!("Above {}", format_gbp_whole(previous)),
        salary: format!("Above {}", format_gbp_whole(previous + allowance)),
        rate: format_rate(config.top_rate),
    });
    rows
}

fn print_year(year: &str, config: &TaxYearConfig) {
    println!();
    match TaxYear::parse(year).and_then(|ty| ty.start_date().zip(ty.end_date())) {
        Some((start, end)) => println!(
            "TAX YEAR {} ({} to {})",
            year,
            start.format("%-d %B %Y"),
            end.format("%-d %B %Y")
        ),
        None => println!("TAX YEAR {}", year),
    }
    println!();
    println!(
        "  Personal Allowance:  {}",
        format_gbp_whole(config.personal_allowance)
    );
    println!(
        "  Taper Threshold:     {}",
        format_gbp_whole(config.allowance_threshold)
    );
    println!(
        "  Allowance Withdrawn: {}",
        format_gbp_whole(config.allowance_cliff())
    );
    println!();

    let table = Table::new(band_rows(config))
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
}
