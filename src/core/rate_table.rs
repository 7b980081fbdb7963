//! Validated set of tax year configurations.
//!
//! The table is built once at start-up, from the rates compiled into the binary plus an
//! optional JSON file, and is read-only afterwards.

use super::config::{ConfigError, TaxYearConfig};
use super::income::{calculate_tax, TaxCalculation, TaxError};
use super::tax_year::TaxYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_RATES: &str = include_str!("../../rates/scotland.json");

#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid rate table JSON")]
    Json(#[from] serde_json::Error),
    #[error("inconsistent rate table")]
    Config(#[from] ConfigError),
}

/// Rate table file format
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RateFile {
    /// Rates keyed by tax year label, e.g. "2025-2026"
    pub tax_years: BTreeMap<String, TaxYearConfig>,
}

impl RateFile {
    pub fn read<R: Read>(reader: R) -> Result<RateFile, RateTableError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn open(path: &Path) -> Result<RateFile, RateTableError> {
        let file = File::open(path).map_err(|source| RateTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read(BufReader::new(file))
    }
}

#[derive(Debug, Clone)]
pub struct RateTable {
    years: BTreeMap<String, TaxYearConfig>,
}

impl RateTable {
    /// Build a table, rejecting it if any year is inconsistent.
    pub fn new(years: BTreeMap<String, TaxYearConfig>) -> Result<Self, ConfigError> {
        if years.is_empty() {
            return Err(ConfigError::NoTaxYears);
        }
        for (year, config) in &years {
            config.validate(year)?;
        }
        Ok(RateTable { years })
    }

    /// Rates compiled into the binary
    pub fn builtin() -> Result<Self, RateTableError> {
        let file = RateFile::read(BUILTIN_RATES.as_bytes())?;
        Ok(Self::new(file.tax_years)?)
    }

    /// Built-in rates, with the years from `extra` added (replacing any with the same key).
    pub fn load(extra: Option<&Path>) -> Result<Self, RateTableError> {
        let mut years = RateFile::read(BUILTIN_RATES.as_bytes())?.tax_years;
        if let Some(path) = extra {
            let file = RateFile::open(path)?;
            log::info!(
                "Read {} tax year(s) from {}",
                file.tax_years.len(),
                path.display()
            );
            years.extend(file.tax_years);
        }
        let table = Self::new(years)?;
        log::info!("Loaded rates for {} tax year(s)", table.len());
        Ok(table)
    }

    pub fn get(&self, year: &str) -> Result<&TaxYearConfig, TaxError> {
        self.years
            .get(year)
            .ok_or_else(|| TaxError::UnknownTaxYear(year.to_string()))
    }

    /// Calculate tax on `salary` using the rates for tax year `year`
    pub fn calculate(&self, salary: Decimal, year: &str) -> Result<TaxCalculation, TaxError> {
        let config = self.get(year)?;
        calculate_tax(salary, config)
    }

    /// Configured tax year keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.years.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaxYearConfig)> {
        self.years.iter().map(|(year, config)| (year.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// The tax year containing `today` if it is configured, otherwise the latest year.
    pub fn default_year(&self, today: NaiveDate) -> &str {
        let current = TaxYear::from_date(today).key();
        match self.years.get_key_value(&current) {
            Some((year, _)) => year.as_str(),
            None => self
                .years
                .keys()
                .next_back()
                .map(String::as_str)
                .unwrap_or_default(),
        }
    }
}
