//! In-memory tax rate store.
//!
//! The store is an ordered list of [`TaxRate`] records keyed by id. It is
//! mutated only through [`add`](TaxRateStore::add),
//! [`update`](TaxRateStore::update), [`toggle`](TaxRateStore::toggle) and
//! [`remove`](TaxRateStore::remove). Nothing is persisted: the store lives
//! exactly as long as its owner.
//!
//! Operations on an unknown id are silent no-ops; their return values say
//! whether anything changed.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::calculations::resolver::resolve;
use crate::models::{CANADA, TaxRate, TaxRateError, TaxRateInput, TaxRateSummary, UNITED_STATES};
use crate::source::{SourceError, TaxRateSource};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateStore {
    rates: Vec<TaxRate>,
}

impl TaxRateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing list, preserving its order.
    pub fn from_rates(rates: Vec<TaxRate>) -> Self {
        Self { rates }
    }

    /// Fetch the initial contents from `source`.
    ///
    /// # Errors
    ///
    /// Whatever the source reports. Callers that keep going after a failed
    /// load fall back to [`TaxRateStore::new`].
    pub async fn load_from(source: &dyn TaxRateSource) -> Result<Self, SourceError> {
        let rates = source.fetch_tax_rates().await?;
        info!(count = rates.len(), source = %source.describe(), "loaded tax rates");
        Ok(Self::from_rates(rates))
    }

    pub fn rates(&self) -> &[TaxRate] {
        &self.rates
    }

    pub fn into_rates(self) -> Vec<TaxRate> {
        self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// First record with the given id.
    pub fn get(&self, id: &str) -> Option<&TaxRate> {
        self.rates.iter().find(|rate| rate.id == id)
    }

    /// Validate `input` and append it as a new effective rate.
    ///
    /// # Errors
    ///
    /// [`TaxRateError`] when a required field is missing or the rate is zero;
    /// the store is left unchanged.
    pub fn add(&mut self, input: TaxRateInput) -> Result<&TaxRate, TaxRateError> {
        self.add_at(input, Utc::now())
    }

    /// [`add`](Self::add) with an explicit clock reading.
    pub fn add_at(
        &mut self,
        input: TaxRateInput,
        now: DateTime<Utc>,
    ) -> Result<&TaxRate, TaxRateError> {
        let id = self.next_id(now);
        let record = input.into_new_record(id, now).inspect_err(|e| {
            warn!(error = %e, "rejected new tax rate");
        })?;
        debug!(id = %record.id, region = %record.region, "added tax rate");

        self.rates.push(record);
        let idx = self.rates.len() - 1;
        Ok(&self.rates[idx])
    }

    /// Validate `input` and replace the first record whose id matches.
    ///
    /// Returns `Ok(None)` when no record has that id. All other records are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// [`TaxRateError`] when the input is invalid; nothing is replaced.
    pub fn update(
        &mut self,
        id: &str,
        input: TaxRateInput,
    ) -> Result<Option<&TaxRate>, TaxRateError> {
        self.update_at(id, input, Utc::now())
    }

    /// [`update`](Self::update) with an explicit clock reading.
    pub fn update_at(
        &mut self,
        id: &str,
        input: TaxRateInput,
        now: DateTime<Utc>,
    ) -> Result<Option<&TaxRate>, TaxRateError> {
        input.validate().inspect_err(|e| {
            warn!(id, error = %e, "rejected tax rate update");
        })?;

        let Some(idx) = self.position(id) else {
            debug!(id, "update ignored; no such tax rate");
            return Ok(None);
        };

        let replacement = input.into_replacement(&self.rates[idx], now)?;
        self.rates[idx] = replacement;
        debug!(id, "updated tax rate");
        Ok(Some(&self.rates[idx]))
    }

    /// Flip the `effective` flag of the first record with this id.
    ///
    /// Returns the new value, or `None` when no record matched.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let rate = self.rates.iter_mut().find(|rate| rate.id == id)?;
        rate.effective = !rate.effective;
        debug!(id, effective = rate.effective, "toggled tax rate");
        Some(rate.effective)
    }

    /// Drop every record with this id. Returns whether any were removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.rates.len();
        self.rates.retain(|rate| rate.id != id);
        let removed = self.rates.len() != before;
        debug!(id, removed, "removed tax rate");
        removed
    }

    /// The rate the calculator would use for `region`.
    ///
    /// See [`resolve`] for the matching rules.
    pub fn resolve(&self, region: &str) -> Option<&TaxRate> {
        resolve(region, &self.rates)
    }

    /// Effective rates in store order.
    pub fn active(&self) -> impl Iterator<Item = &TaxRate> {
        self.rates.iter().filter(|rate| rate.effective)
    }

    /// Rates whose country equals `country` exactly.
    pub fn by_country<'a>(
        &'a self,
        country: &'a str,
    ) -> impl Iterator<Item = &'a TaxRate> + 'a {
        self.rates.iter().filter(move |rate| rate.country == country)
    }

    pub fn summary(&self) -> TaxRateSummary {
        TaxRateSummary {
            total: self.rates.len(),
            active: self.active().count(),
            canada: self.by_country(CANADA).count(),
            united_states: self.by_country(UNITED_STATES).count(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rates.iter().position(|rate| rate.id == id)
    }

    /// `tax_<millis>`, bumped forward while it collides with an existing id.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("tax_{millis}");
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }
}
