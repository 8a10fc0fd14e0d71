pub mod calculations;
pub mod models;
pub mod source;
pub mod store;

pub use calculations::{CalculationError, calculate, calculate_for_region, resolve};
pub use models::*;
pub use source::{SourceConfig, SourceError, SourceFactory, SourceRegistry, TaxRateSource};
pub use store::TaxRateStore;
