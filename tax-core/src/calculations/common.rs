//! Common decimal helpers for tax rates.
//!
//! Rates are stored as fractions (`0.13`) but entered and shown as
//! percentages (`13`). This module owns that conversion along with the
//! rounding and display formatting used for percentages and currency.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats `value` with exactly `dp` decimal places, rounding half-up.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::to_fixed;
///
/// assert_eq!(to_fixed(dec!(13), 4), "13.0000");
/// assert_eq!(to_fixed(dec!(8.875), 2), "8.88");
/// ```
pub fn to_fixed(
    value: Decimal,
    dp: u32,
) -> String {
    let mut fixed = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(dp);
    fixed.to_string()
}

/// Converts an entered percentage into a stored fraction (`13` → `0.13`).
pub fn percent_to_rate(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Converts a stored fraction into a percentage (`0.13` → `13`).
///
/// Rates too large to scale clamp to [`Decimal::MAX`] / [`Decimal::MIN`].
pub fn rate_to_percent(rate: Decimal) -> Decimal {
    rate.saturating_mul(Decimal::ONE_HUNDRED)
}

/// Formats a fractional rate as a percentage with two decimals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::format_percent;
///
/// assert_eq!(format_percent(dec!(0.13)), "13.00%");
/// assert_eq!(format_percent(dec!(0.08875)), "8.88%");
/// ```
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", to_fixed(rate_to_percent(rate), 2))
}

/// Formats an amount as US dollars: cents rounded half-up, comma thousands
/// separators, and a leading minus sign for negatives.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.567)), "$1,234.57");
/// assert_eq!(format_currency(dec!(-5)), "-$5.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let fixed = to_fixed(rounded.abs(), 2);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    format!("{sign}${}.{cents}", group_thousands(whole))
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
