//! Plain-text views of the store: the rate table, the summary cards and the
//! calculator panel.

use tax_core::calculations::{format_currency, format_percent};
use tax_core::{TaxCalculation, TaxRate, TaxRateSummary};

const TABLE_HEADERS: [&str; 7] = ["ID", "Region", "Name", "Location", "Rate", "Registration", "Status"];

/// Renders rates as an aligned table, one row per rate, in the order given.
pub fn rates_table<'a>(rates: impl IntoIterator<Item = &'a TaxRate>) -> String {
    let rows: Vec<[String; 7]> = rates.into_iter().map(table_row).collect();
    if rows.is_empty() {
        return "No tax rates\n".to_string();
    }

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, TABLE_HEADERS.iter().copied(), &widths);
    push_line(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
        &widths,
    );
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn table_row(rate: &TaxRate) -> [String; 7] {
    let location = [rate.state.as_deref(), rate.city.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    [
        rate.id.clone(),
        format!("{} ({})", rate.region, rate.country),
        rate.name.clone(),
        location,
        format_percent(rate.rate),
        rate.registration_number.clone().unwrap_or_else(|| "-".to_string()),
        if rate.effective { "Active" } else { "Inactive" }.to_string(),
    ]
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn summary_cards(summary: &TaxRateSummary) -> String {
    format!(
        "Total Tax Rates: {}\nActive Rates:    {}\nCanada:          {}\nUnited States:   {}\n",
        summary.total, summary.active, summary.canada, summary.united_states
    )
}

/// Amounts are shown rounded to cents; the calculation itself is not.
pub fn calculation_panel(calculation: &TaxCalculation) -> String {
    let taxes: String = calculation
        .applied_rates
        .iter()
        .map(|applied| {
            format!(
                "Tax ({} @ {}): {}\n",
                applied.region,
                format_percent(applied.rate),
                format_currency(applied.amount)
            )
        })
        .collect();
    format!(
        "Subtotal: {}\n{taxes}Total: {}\n",
        format_currency(calculation.subtotal),
        format_currency(calculation.total)
    )
}
