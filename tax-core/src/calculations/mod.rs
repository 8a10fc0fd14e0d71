//! Tax rate resolution and calculation.
//!
//! The resolver picks the active rate for a region; the calculator applies
//! it to an amount. Shared decimal helpers (percent conversion, rounding and
//! display formatting) live in [`common`].

pub mod calculator;
pub mod common;
pub mod resolver;

pub use calculator::{CalculationError, calculate, calculate_for_region};
pub use common::{format_currency, format_percent, percent_to_rate, rate_to_percent};
pub use resolver::resolve;
