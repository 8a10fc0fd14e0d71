use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{percent_to_rate, rate_to_percent};

/// Country name counted as Canadian in summaries.
pub const CANADA: &str = "Canada";

/// Country name counted as American in summaries.
pub const UNITED_STATES: &str = "United States";

/// One jurisdiction's tax rate configuration.
///
/// Serialized with camelCase keys so fixture documents such as
/// `{"taxRates": [{"id": "tax_1", "region": "CA_ON", ...}]}` load as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRate {
    /// `tax_<unix millis>` of creation.
    pub id: String,
    /// Lookup key used by the resolver (`CA_ON`, `US_NY`). Not unique.
    pub region: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Fraction, e.g. `0.13` for 13%.
    pub rate: Decimal,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    /// Only effective rates are eligible for calculation.
    pub effective: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rejections raised when a [`TaxRateInput`] cannot become a [`TaxRate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxRateError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("tax rate must not be zero")]
    ZeroRate,
}

/// Add/edit form values for a tax rate.
///
/// The rate is held as a percentage (`13` for 13%); it is divided by 100 when
/// the input becomes a record. Optional text fields are empty strings when
/// unset, matching what a form hands over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateInput {
    pub region: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub rate_percent: Decimal,
    pub name: String,
    pub description: String,
    pub registration_number: String,
}

impl TaxRateInput {
    /// Checks the required fields: region, country and name must be present
    /// and the rate must be non-zero.
    ///
    /// Negative rates and duplicate regions are accepted.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{TaxRateError, TaxRateInput};
    ///
    /// let input = TaxRateInput {
    ///     region: "CA_ON".to_string(),
    ///     country: "Canada".to_string(),
    ///     name: "Ontario HST".to_string(),
    ///     rate_percent: dec!(0),
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(input.validate(), Err(TaxRateError::ZeroRate));
    /// ```
    pub fn validate(&self) -> Result<(), TaxRateError> {
        if self.region.trim().is_empty() {
            return Err(TaxRateError::MissingField("region"));
        }
        if self.country.trim().is_empty() {
            return Err(TaxRateError::MissingField("country"));
        }
        if self.name.trim().is_empty() {
            return Err(TaxRateError::MissingField("name"));
        }
        if self.rate_percent.is_zero() {
            return Err(TaxRateError::ZeroRate);
        }
        Ok(())
    }

    /// The fractional rate this input describes.
    pub fn rate(&self) -> Decimal {
        percent_to_rate(self.rate_percent)
    }

    /// Builds a fresh, effective record stamped with `now`.
    pub(crate) fn into_new_record(
        self,
        id: String,
        now: DateTime<Utc>,
    ) -> Result<TaxRate, TaxRateError> {
        self.validate()?;
        let rate = self.rate();
        Ok(TaxRate {
            id,
            region: self.region,
            country: self.country,
            state: non_empty(self.state),
            city: non_empty(self.city),
            rate,
            name: self.name,
            description: self.description,
            registration_number: non_empty(self.registration_number),
            effective: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces every editable field of `existing`.
    ///
    /// `id`, `effective` and `created_at` carry over; `updated_at` becomes `now`.
    pub(crate) fn into_replacement(
        self,
        existing: &TaxRate,
        now: DateTime<Utc>,
    ) -> Result<TaxRate, TaxRateError> {
        self.validate()?;
        let rate = self.rate();
        Ok(TaxRate {
            id: existing.id.clone(),
            region: self.region,
            country: self.country,
            state: non_empty(self.state),
            city: non_empty(self.city),
            rate,
            name: self.name,
            description: self.description,
            registration_number: non_empty(self.registration_number),
            effective: existing.effective,
            created_at: existing.created_at,
            updated_at: now,
        })
    }
}

impl From<&TaxRate> for TaxRateInput {
    /// Pre-fills an edit form from a stored record.
    fn from(rate: &TaxRate) -> Self {
        Self {
            region: rate.region.clone(),
            country: rate.country.clone(),
            state: rate.state.clone().unwrap_or_default(),
            city: rate.city.clone().unwrap_or_default(),
            rate_percent: rate_to_percent(rate.rate),
            name: rate.name.clone(),
            description: rate.description.clone(),
            registration_number: rate.registration_number.clone().unwrap_or_default(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
