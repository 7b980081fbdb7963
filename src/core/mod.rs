pub mod config;
pub mod income;
pub mod rate_table;
pub mod tax_year;

// Flat public surface for domain types and functions.
pub use config::{AllowanceStatus, ConfigError, TaxBand, TaxYearConfig};
pub use income::{calculate_tax, round_currency, BandLabel, BandTax, TaxCalculation, TaxError};
pub use rate_table::{RateFile, RateTable, RateTableError};
pub use tax_year::TaxYear;
