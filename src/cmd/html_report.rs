//! HTML report command
//!
//! Writes a self-contained HTML page (embedded CSS) for one calculation.

use super::html::generate_html;
use super::{resolve_year, year_config, RatesArgs};
use crate::core::calculate_tax;
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    /// Annual gross salary in pounds
    #[arg(allow_hyphen_values = true)]
    salary: Decimal,

    /// Tax year (e.g., 2025-2026). Defaults to the current tax year
    #[arg(short, long)]
    year: Option<String>,

    #[command(flatten)]
    rates: RatesArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = self.rates.load()?;
        let year = resolve_year(&table, self.year.as_deref());
        let config = year_config(&table, &year)?;
        let result = calculate_tax(self.salary, config)?;

        let html = generate_html(&year, config, &result);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            println!("HTML report written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let file_name = year.replace(|c: char| !c.is_ascii_alphanumeric() && c != '-', "_");
            let temp_path = std::env::temp_dir().join(format!("sitax-{}.html", file_name));
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}
