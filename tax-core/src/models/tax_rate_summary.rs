use serde::{Deserialize, Serialize};

/// Headline counts over a set of tax rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateSummary {
    pub total: usize,
    pub active: usize,
    /// Rates whose country is exactly [`CANADA`](crate::models::CANADA).
    pub canada: usize,
    /// Rates whose country is exactly [`UNITED_STATES`](crate::models::UNITED_STATES).
    pub united_states: usize,
}
