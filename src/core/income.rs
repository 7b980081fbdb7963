use super::config::TaxYearConfig;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use thiserror::Error;

/// Reasons a calculation is rejected before any figures are produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("salary must not be negative (got {0})")]
    InvalidSalary(Decimal),
    #[error("tax year not found: {0}")]
    UnknownTaxYear(String),
}

/// Gross salary range that a breakdown entry covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandLabel {
    /// A configured band, inclusive of both ends
    Range { from: Decimal, to: Decimal },
    /// The open-ended top rate remainder
    Above(Decimal),
}

impl fmt::Display for BandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandLabel::Range { from, to } => write!(f, "{} - {}", from, to),
            BandLabel::Above(salary) => write!(f, "above {}", salary),
        }
    }
}

/// Tax charged on the part of the taxable income falling in one band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandTax {
    pub label: BandLabel,
    pub taxable_amount: Decimal,
    pub rate: Decimal,
    /// Rounded to pence
    pub tax: Decimal,
}

/// Result of an income tax calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxCalculation {
    pub salary: Decimal,
    /// Personal allowance after the taper
    pub personal_allowance: Decimal,
    pub taxable_income: Decimal,
    /// Entries in ascending income order
    pub breakdown: Vec<BandTax>,
    /// Sum of the breakdown entries' tax
    pub total_tax: Decimal,
}

impl TaxCalculation {
    /// Salary less income tax (National Insurance is not included)
    pub fn take_home(&self) -> Decimal {
        self.salary - self.total_tax
    }

    /// Total tax as a fraction of salary, zero when there is no salary
    pub fn effective_rate(&self) -> Decimal {
        if self.salary.is_zero() {
            Decimal::ZERO
        } else {
            self.total_tax / self.salary
        }
    }
}

/// Round a currency amount to pence, midpoints away from zero
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate income tax on an annual salary for one tax year's rates.
///
/// Band upper bounds are measured on the taxable income scale, so each band starts where
/// the previous one ended once the personal allowance has been taken off. Each entry's
/// tax is rounded to pence before it is added to the total, which keeps the total equal
/// to the sum of the entries.
pub fn calculate_tax(salary: Decimal, config: &TaxYearConfig) -> Result<TaxCalculation, TaxError> {
    if salary < Decimal::ZERO {
        return Err(TaxError::InvalidSalary(salary));
    }

    let allowance = config.personal_allowance_for(salary);
    let taxable_income = (salary - allowance).max(Decimal::ZERO);
    log::debug!(
        "Salary {}: allowance {} (cliff {}), taxable income {}",
        salary,
        allowance,
        config.allowance_cliff(),
        taxable_income
    );

    let mut breakdown = Vec::new();
    let mut previous_limit = Decimal::ZERO;

    for band in &config.bands {
        if taxable_income <= previous_limit {
            break;
        }
        let width = band.upper_bound - previous_limit;
        let taxable_amount = (taxable_income - previous_limit).min(width);
        let tax = round_currency(taxable_amount * band.rate);
        log::debug!(
            "Band to {} @ {}: amount={}, tax={}",
            band.upper_bound,
            band.rate,
            taxable_amount,
            tax
        );
        breakdown.push(BandTax {
            label: BandLabel::Range {
                from: previous_limit + allowance + Decimal::ONE,
                to: band.upper_bound + allowance,
            },
            taxable_amount,
            rate: band.rate,
            tax,
        });
        previous_limit = band.upper_bound;
    }

    if taxable_income > previous_limit {
        let taxable_amount = taxable_income - previous_limit;
        let tax = round_currency(taxable_amount * config.top_rate);
        log::debug!(
            "Top rate @ {}: amount={}, tax={}",
            config.top_rate,
            taxable_amount,
            tax
        );
        breakdown.push(BandTax {
            label: BandLabel::Above(previous_limit + allowance),
            taxable_amount,
            rate: config.top_rate,
            tax,
        });
    }

    let total_tax = breakdown.iter().map(|entry| entry.tax).sum();

    Ok(TaxCalculation {
        salary,
        personal_allowance: allowance,
        taxable_income,
        breakdown,
        total_tax,
    })
}
