pub mod calculate;
pub mod format;
pub mod html;
pub mod html_report;
pub mod schema;
pub mod years;

use crate::core::{RateTable, TaxYearConfig};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

/// Where to read tax rates from, shared by every command
#[derive(Args, Debug)]
pub struct RatesArgs {
    /// JSON rate table with extra tax years (replaces built-in years with the same key)
    #[arg(long, env = "SITAX_RATES")]
    rates: Option<PathBuf>,
}

impl RatesArgs {
    /// Load and validate the rate table; any inconsistency is fatal
    pub fn load(&self) -> anyhow::Result<RateTable> {
        RateTable::load(self.rates.as_deref()).context("Failed to load tax rates")
    }
}

/// The requested tax year, or the current one (falling back to the latest configured)
pub fn resolve_year(table: &RateTable, year: Option<&str>) -> String {
    match year {
        Some(year) => year.to_string(),
        None => {
            let today = chrono::Local::now().date_naive();
            table.default_year(today).to_string()
        }
    }
}

/// Rates for `year`; an unknown year keeps its `TaxError` and lists the configured years
pub fn year_config<'a>(table: &'a RateTable, year: &str) -> anyhow::Result<&'a TaxYearConfig> {
    let config = table.get(year).with_context(|| {
        format!(
            "Cannot calculate for tax year {} (configured tax years: {})",
            year,
            table.keys().collect::<Vec<_>>().join(", ")
        )
    })?;
    Ok(config)
}
