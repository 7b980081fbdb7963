//! Display formatting for currency amounts, rates and band labels.

use crate::core::{round_currency, BandLabel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Pounds and pence with thousands separators, e.g. "£12,570.00"
pub fn format_gbp(amount: Decimal) -> String {
    let formatted = format_amount(amount.abs());
    let (whole, pence) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    format!("{}£{}.{}", sign, group_thousands(whole), pence)
}

/// Plain amount to pence for machine-readable output, e.g. "6397.17"
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_currency(amount))
}

/// Like [`format_gbp`] but drops the pence when the amount is whole, e.g. "£12,571"
pub fn format_gbp_whole(amount: Decimal) -> String {
    if amount.fract().is_zero() {
        let sign = if amount < Decimal::ZERO { "-" } else { "" };
        format!("{}£{}", sign, group_thousands(&amount.abs().trunc().normalize().to_string()))
    } else {
        format_gbp(amount)
    }
}

/// Rate as a percentage, e.g. "19%" or "8.75%"
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

/// Gross salary range of a breakdown entry, e.g. "£12,571 - £27,967"
pub fn format_label(label: &BandLabel) -> String {
    match label {
        BandLabel::Range { from, to } => {
            format!("{} - {}", format_gbp_whole(*from), format_gbp_whole(*to))
        }
        BandLabel::Above(salary) => format!("Above {}", format_gbp_whole(*salary)),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
