use std::io::Read;

use serde::{Deserialize, Serialize};
use tax_core::TaxRate;
use thiserror::Error;

/// Errors that can occur when reading a tax rate fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return FixtureError::Io(err.into());
        }
        FixtureError::JsonParse(err.to_string())
    }
}

/// Top-level shape of a fixture document.
///
/// ```json
/// { "taxRates": [ { "id": "tax_1", "region": "CA_ON", ... } ] }
/// ```
///
/// Each element uses the camelCase field names of [`TaxRate`]; `state`,
/// `city`, `registrationNumber` and `description` may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureDocument {
    pub tax_rates: Vec<TaxRate>,
}

/// Reader for tax rate fixture documents.
pub struct FixtureLoader;

impl FixtureLoader {
    /// Parse a fixture document from any reader, such as a file or a byte
    /// slice. Records are returned in document order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxRate>, FixtureError> {
        let document: FixtureDocument = serde_json::from_reader(reader)?;
        Ok(document.tax_rates)
    }

    /// Parse a fixture document already held in memory.
    pub fn parse_str(input: &str) -> Result<Vec<TaxRate>, FixtureError> {
        let document: FixtureDocument = serde_json::from_str(input)?;
        Ok(document.tax_rates)
    }
}
