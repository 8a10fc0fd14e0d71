use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxRate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Tax rate source not found: {0}")]
    NotFound(String),

    #[error("Invalid tax rate document: {0}")]
    InvalidDocument(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Read-only origin of the initial tax rate list.
///
/// A source is consulted once when a store is created; it is never written
/// back to.
#[async_trait]
pub trait TaxRateSource: Send + Sync {
    /// Short human-readable label, used in logs.
    fn describe(&self) -> String;

    async fn fetch_tax_rates(&self) -> Result<Vec<TaxRate>, SourceError>;
}
