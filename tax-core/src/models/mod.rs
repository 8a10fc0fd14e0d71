mod tax_calculation;
mod tax_rate;
mod tax_rate_summary;

pub use tax_calculation::{AppliedRate, TaxCalculation};
pub use tax_rate::{CANADA, TaxRate, TaxRateError, TaxRateInput, UNITED_STATES};
pub use tax_rate_summary::TaxRateSummary;
