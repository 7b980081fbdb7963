//! HTML report generation.

use super::calculate::allowance_note;
use super::format::{format_gbp, format_label, format_rate};
use crate::core::{TaxCalculation, TaxYearConfig};
use std::fmt::Write;

const TEMPLATE: &str = include_str!("report.html");
const CSS: &str = include_str!("report.css");

/// Generate a self-contained HTML page for a calculation
pub fn generate_html(year: &str, config: &TaxYearConfig, result: &TaxCalculation) -> String {
    // The year key comes from the rate file, so it is substituted last
    TEMPLATE
        .replace("__CSS__", CSS)
        .replace("__SUMMARY__", &summary(config, result))
        .replace("__BREAKDOWN__", &breakdown(result))
        .replace("__TOTALS__", &totals(result))
        .replace("__TAX_YEAR__", &escape(year))
}

fn summary(config: &TaxYearConfig, result: &TaxCalculation) -> String {
    let note = allowance_note(config, result.salary)
        .map(|note| format!(" <span class=\"note\">({})</span>", escape(&note)))
        .unwrap_or_default();
    let rows = [
        ("Annual Salary", format_gbp(result.salary)),
        (
            "Personal Allowance",
            format!("{}{}", format_gbp(result.personal_allowance), note),
        ),
        ("Taxable Income", format_gbp(result.taxable_income)),
    ];

    let mut html = String::from("            <dl>\n");
    for (term, value) in rows {
        let _ = writeln!(html, "                <dt>{}</dt><dd>{}</dd>", term, value);
    }
    html.push_str("            </dl>");
    html
}

fn breakdown(result: &TaxCalculation) -> String {
    if result.breakdown.is_empty() {
        return "            <p>No tax due.</p>".to_string();
    }

    let mut html = String::from(
        "            <table>\n                <thead><tr><th>Band</th><th>Taxable</th><th>Rate</th><th>Tax</th></tr></thead>\n                <tbody>\n",
    );
    for entry in &result.breakdown {
        let _ = writeln!(
            html,
            "                    <tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape(&format_label(&entry.label)),
            format_gbp(entry.taxable_amount),
            format_rate(entry.rate),
            format_gbp(entry.tax)
        );
    }
    html.push_str("                </tbody>\n            </table>");
    html
}

fn totals(result: &TaxCalculation) -> String {
    format!(
        concat!(
            "            <p class=\"total\"><strong>Total Scottish Income Tax due:</strong> {}</p>\n",
            "            <p class=\"take-home\"><strong>Take-home pay (pre-NI):</strong> {}</p>"
        ),
        format_gbp(result.total_tax),
        format_gbp(result.take_home())
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
