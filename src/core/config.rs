//! Tax year rate configuration: personal allowance, taper and bands.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integrity problems in a tax year configuration, detected when a rate table is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no tax years configured")]
    NoTaxYears,
    #[error("{year}: no tax bands configured")]
    NoBands { year: String },
    #[error("{year}: band {index} upper bound {upper_bound} must exceed {previous}")]
    BandsNotIncreasing {
        year: String,
        index: usize,
        upper_bound: Decimal,
        previous: Decimal,
    },
    /// `band` is the index of the offending band, `None` for the top rate
    #[error("{year}: {} rate {rate} must be greater than 0 and less than 1", rate_name(.band))]
    RateOutOfRange {
        year: String,
        band: Option<usize>,
        rate: Decimal,
    },
    #[error("{year}: {what} must not be negative (got {amount})")]
    NegativeAmount {
        year: String,
        what: &'static str,
        amount: Decimal,
    },
}

/// A tax band on the taxable income scale.
///
/// `upper_bound` is measured from zero taxable income, i.e. after the personal allowance
/// has been subtracted from the salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxBand {
    /// Upper limit of the band in taxable income
    #[schemars(with = "f64")]
    pub upper_bound: Decimal,
    /// Marginal rate applied inside the band (e.g. 0.19 for 19%)
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

/// Rates and allowances for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxYearConfig {
    /// Personal allowance before any taper
    #[schemars(with = "f64")]
    pub personal_allowance: Decimal,
    /// Salary above which the personal allowance is tapered
    #[schemars(with = "f64")]
    pub allowance_threshold: Decimal,
    /// Bands in ascending order of upper bound
    pub bands: Vec<TaxBand>,
    /// Rate applied to taxable income above the last band
    #[schemars(with = "f64")]
    pub top_rate: Decimal,
}

/// How much of the personal allowance survives the taper for a given salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceStatus {
    Full,
    Tapered,
    Withdrawn,
}

impl TaxYearConfig {
    /// Salary at which the taper has removed the whole allowance.
    ///
    /// One pound of allowance is lost for every two pounds above the threshold, so the
    /// allowance is exhausted at `threshold + 2 * allowance`.
    pub fn allowance_cliff(&self) -> Decimal {
        self.allowance_threshold + dec!(2) * self.personal_allowance
    }

    pub fn allowance_status(&self, salary: Decimal) -> AllowanceStatus {
        if salary >= self.allowance_cliff() {
            AllowanceStatus::Withdrawn
        } else if salary > self.allowance_threshold {
            AllowanceStatus::Tapered
        } else {
            AllowanceStatus::Full
        }
    }

    /// Effective personal allowance after the taper.
    pub fn personal_allowance_for(&self, salary: Decimal) -> Decimal {
        match self.allowance_status(salary) {
            AllowanceStatus::Full => self.personal_allowance,
            AllowanceStatus::Tapered => {
                self.personal_allowance - (salary - self.allowance_threshold) / dec!(2)
            }
            AllowanceStatus::Withdrawn => Decimal::ZERO,
        }
    }

    /// Check the configuration is usable. `year` is only used for error messages.
    pub fn validate(&self, year: &str) -> Result<(), ConfigError> {
        let non_negative = [
            ("personal allowance", self.personal_allowance),
            ("allowance threshold", self.allowance_threshold),
        ];
        for (what, amount) in non_negative {
            if amount < Decimal::ZERO {
                return Err(ConfigError::NegativeAmount {
                    year: year.to_string(),
                    what,
                    amount,
                });
            }
        }

        if self.bands.is_empty() {
            return Err(ConfigError::NoBands {
                year: year.to_string(),
            });
        }

        let mut previous = Decimal::ZERO;
        for (index, band) in self.bands.iter().enumerate() {
            if band.upper_bound <= previous {
                return Err(ConfigError::BandsNotIncreasing {
                    year: year.to_string(),
                    index,
                    upper_bound: band.upper_bound,
                    previous,
                });
            }
            check_rate(year, Some(index), band.rate)?;
            previous = band.upper_bound;
        }

        check_rate(year, None, self.top_rate)
    }
}

fn check_rate(year: &str, band: Option<usize>, rate: Decimal) -> Result<(), ConfigError> {
    if rate > Decimal::ZERO && rate < Decimal::ONE {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange {
            year: year.to_string(),
            band,
            rate,
        })
    }
}

fn rate_name(band: &Option<usize>) -> String {
    match band {
        Some(index) => format!("band {index}"),
        None => "top".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn scotland_2025_26() -> TaxYearConfig {
    let band = |upper_bound, rate| TaxBand { upper_bound, rate };
    TaxYearConfig {
        personal_allowance: dec!(12570),
        allowance_threshold: dec!(100000),
        bands: vec![
            band(dec!(15397), dec!(0.19)),
            band(dec!(27491), dec!(0.20)),
            band(dec!(43662), dec!(0.21)),
            band(dec!(75000), dec!(0.42)),
            band(dec!(125140), dec!(0.45)),
        ],
        top_rate: dec!(0.48),
    }
}
