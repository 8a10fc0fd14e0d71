//! Single-rate tax calculation.
//!
//! A calculation applies exactly one resolved rate to an amount:
//!
//! | Field        | Value                         |
//! |--------------|-------------------------------|
//! | `subtotal`   | the amount as given           |
//! | `tax_amount` | `amount × rate`               |
//! | `total`      | `subtotal + tax_amount`       |
//!
//! No rounding is applied here. Callers that display results round with
//! [`format_currency`](super::common::format_currency). Products or sums
//! beyond the range of [`Decimal`] are reported as
//! [`CalculationError::Overflow`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{TaxRateInput, TaxRateStore, calculations::calculate};
//!
//! let mut store = TaxRateStore::new();
//! store
//!     .add(TaxRateInput {
//!         region: "CA_ON".to_string(),
//!         country: "Canada".to_string(),
//!         name: "Ontario HST".to_string(),
//!         rate_percent: dec!(13),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let rate = store.resolve("CA_ON").unwrap();
//! let result = calculate(dec!(100), rate).unwrap();
//!
//! assert_eq!(result.tax_amount, dec!(13));
//! assert_eq!(result.total, dec!(113));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::resolver::resolve;
use crate::models::{AppliedRate, TaxCalculation, TaxRate};

/// Reasons a calculator request cannot produce a result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// The amount was zero or no region was chosen.
    #[error("an amount and a region are required")]
    MissingInput,

    /// No effective rate exists for the region.
    #[error("no active tax rate for region '{0}'")]
    NoActiveRate(String),

    /// The tax or the total does not fit in a [`Decimal`].
    #[error("tax on {amount} at rate {rate} is out of range")]
    Overflow { amount: Decimal, rate: Decimal },
}

/// Applies `rate` to `amount`.
///
/// # Errors
///
/// [`CalculationError::Overflow`] when the tax or the total leaves the
/// range of [`Decimal`].
pub fn calculate(
    amount: Decimal,
    rate: &TaxRate,
) -> Result<TaxCalculation, CalculationError> {
    let overflow = || CalculationError::Overflow {
        amount,
        rate: rate.rate,
    };
    let tax_amount = amount.checked_mul(rate.rate).ok_or_else(overflow)?;
    let total = amount.checked_add(tax_amount).ok_or_else(overflow)?;

    Ok(TaxCalculation {
        subtotal: amount,
        tax_amount,
        total,
        applied_rates: vec![AppliedRate {
            region: rate.region.clone(),
            rate: rate.rate,
            amount: tax_amount,
        }],
    })
}

/// Resolves the active rate for `region` and applies it to `amount`.
///
/// # Errors
///
/// * [`CalculationError::MissingInput`] when `amount` is zero or `region`
///   is blank.
/// * [`CalculationError::NoActiveRate`] when no effective rate matches.
/// * [`CalculationError::Overflow`] when the result is out of range.
pub fn calculate_for_region(
    rates: &[TaxRate],
    region: &str,
    amount: Decimal,
) -> Result<TaxCalculation, CalculationError> {
    if amount.is_zero() || region.trim().is_empty() {
        return Err(CalculationError::MissingInput);
    }

    let Some(rate) = resolve(region, rates) else {
        warn!(region, "no active tax rate for region");
        return Err(CalculationError::NoActiveRate(region.to_string()));
    };

    let result = calculate(amount, rate).inspect_err(|e| {
        warn!(region, rate_id = %rate.id, error = %e, "tax calculation out of range");
    })?;
    debug!(
        region,
        rate_id = %rate.id,
        subtotal = %result.subtotal,
        tax = %result.tax_amount,
        "calculated tax"
    );
    Ok(result)
}
