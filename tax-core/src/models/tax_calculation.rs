use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One rate applied to a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRate {
    pub region: String,
    /// Fractional rate, e.g. `0.13`.
    pub rate: Decimal,
    /// Tax contributed by this rate.
    pub amount: Decimal,
}

/// Outcome of applying a tax rate to an amount.
///
/// Values are unrounded; rounding to cents is a display concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculation {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub applied_rates: Vec<AppliedRate>,
}
