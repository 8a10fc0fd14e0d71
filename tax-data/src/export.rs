//! CSV export of tax rates.
//!
//! ## CSV Format
//!
//! One header row followed by one row per rate, in store order:
//!
//! | Column                | Source                                    |
//! |-----------------------|-------------------------------------------|
//! | `Region`              | `region`                                  |
//! | `Country`             | `country`                                 |
//! | `State`               | `state`, empty when absent                |
//! | `City`                | `city`, empty when absent                 |
//! | `Rate (%)`            | `rate × 100`, fixed to 4 decimal places   |
//! | `Name`                | `name`                                    |
//! | `Description`         | `description`                             |
//! | `Registration Number` | `registration_number`, empty when absent  |
//! | `Status`              | `Active` or `Inactive`                    |
//!
//! Rows end in `\n`. Cells containing a comma, a double quote or a line
//! break are quoted with embedded quotes doubled; all other cells are
//! written bare.
//!
//! ### Example
//!
//! ```csv
//! Region,Country,State,City,Rate (%),Name,Description,Registration Number,Status
//! CA_ON,Canada,Ontario,Toronto,13.0000,Ontario HST,"Harmonized Sales Tax, Ontario",123456789RT0001,Active
//! ```
use std::io::Write;

use tax_core::TaxRate;
use tax_core::calculations::common::{rate_to_percent, to_fixed};
use thiserror::Error;
use tracing::debug;

/// Default file name offered for a download of the export.
pub const EXPORT_FILE_NAME: &str = "tax-rates.csv";

/// Header row, in column order.
pub const CSV_HEADERS: [&str; 9] = [
    "Region",
    "Country",
    "State",
    "City",
    "Rate (%)",
    "Name",
    "Description",
    "Registration Number",
    "Status",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes tax rates as CSV.
pub struct TaxRateExporter;

impl TaxRateExporter {
    /// Render `rates` as CSV text.
    pub fn to_csv(rates: &[TaxRate]) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        Self::write_csv(rates, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Stream `rates` as CSV into `writer`.
    pub fn write_csv<W: Write>(
        rates: &[TaxRate],
        writer: W,
    ) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(CSV_HEADERS)?;
        for rate in rates {
            csv_writer.write_record(row(rate))?;
        }
        csv_writer.flush()?;

        debug!(rows = rates.len(), "exported tax rates");
        Ok(())
    }
}

fn row(rate: &TaxRate) -> [String; 9] {
    [
        rate.region.clone(),
        rate.country.clone(),
        rate.state.clone().unwrap_or_default(),
        rate.city.clone().unwrap_or_default(),
        to_fixed(rate_to_percent(rate.rate), 4),
        rate.name.clone(),
        rate.description.clone(),
        rate.registration_number.clone().unwrap_or_default(),
        status_label(rate.effective).to_string(),
    ]
}

fn status_label(effective: bool) -> &'static str {
    if effective { "Active" } else { "Inactive" }
}
