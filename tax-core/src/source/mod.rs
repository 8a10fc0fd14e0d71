pub mod factory;
pub mod provider;

pub use factory::{SourceConfig, SourceFactory, SourceRegistry};
pub use provider::{SourceError, TaxRateSource};
