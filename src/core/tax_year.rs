use chrono::{Datelike, NaiveDate};

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the end year (e.g., 2026 = 2025-2026 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Create a tax year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        // On or after 6 April the date belongs to the tax year ending next April
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(date.year() + 1)
        } else {
            TaxYear(date.year())
        }
    }

    /// Parse a rate table key such as "2025-2026"
    pub fn parse(key: &str) -> Option<TaxYear> {
        let (start, end) = key.split_once('-')?;
        let start: i32 = start.trim().parse().ok()?;
        let end: i32 = end.trim().parse().ok()?;
        (end == start + 1).then_some(TaxYear(end))
    }

    /// Start date of the tax year (6 April of previous year)
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 6)
    }

    /// End date of the tax year (5 April)
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 5)
    }

    /// Rate table key, e.g. "2025-2026"
    pub fn key(&self) -> String {
        format!("{}-{}", self.0 - 1, self.0)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
