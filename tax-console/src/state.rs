//! Console state.
//!
//! Lives for one process: the tax rate list loaded at startup, every change
//! made to it since, and the most recent calculation. Nothing here is
//! written back to the source.

use tax_core::{TaxCalculation, TaxRateStore};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: TaxRateStore,
    /// Result shown in the calculator panel. Kept until the next successful
    /// calculation.
    pub last_calculation: Option<TaxCalculation>,
    /// `describe()` of the source the store was loaded from, if any.
    pub source: Option<String>,
}

impl AppState {
    pub fn new(store: TaxRateStore) -> Self {
        Self {
            store,
            ..Default::default()
        }
    }

    pub fn has_calculation(&self) -> bool {
        self.last_calculation.is_some()
    }
}
