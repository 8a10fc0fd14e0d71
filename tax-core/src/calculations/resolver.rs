//! Region to tax rate resolution.

use tracing::trace;

use crate::models::TaxRate;

/// Finds the rate that applies to `region`.
///
/// Scans `rates` in order and returns the first record whose region equals
/// `region` exactly (case-sensitive, no normalization) and which is
/// effective. When several effective records share a region, the earliest
/// one in store order wins.
///
/// # Example
///
/// ```
/// use tax_core::calculations::resolve;
///
/// assert!(resolve("US_NY", &[]).is_none());
/// ```
pub fn resolve<'a>(
    region: &str,
    rates: &'a [TaxRate],
) -> Option<&'a TaxRate> {
    let found = rates
        .iter()
        .find(|rate| rate.effective && rate.region == region);
    trace!(region, found = found.map(|r| r.id.as_str()), "resolved tax rate");
    found
}
