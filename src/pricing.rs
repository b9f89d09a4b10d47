//! Commission-free price computation.
//!
//! The source platform's displayed price is `net * (1 + rate / 100)`,
//! so the net price is recovered by dividing the gross price by that factor.
//!
//! All rounding goes through [`round_to`], which rounds half away from
//! zero. The tolerance comparison in [`price_changed`] runs on these
//! rounded values.

use log::{debug, warn};

use crate::error::{Result, SyncError};
use crate::models::PriceValue;

/// Default commission charged by the source platform, in percent
pub const DEFAULT_COMMISSION_RATE: f64 = 13.0;
/// Default number of decimals for computed prices
pub const DEFAULT_ROUND_DIGITS: u32 = 2;
/// Default minimum price delta that triggers an update
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Slack absorbing binary floating-point noise in subtractions such as
/// `100.01 - 100.0`, which is slightly above 0.01 as an f64.
const FLOAT_SLACK: f64 = 1e-9;

/// Parse a price string, handling comma as decimal separator.
///
/// # Examples
/// - "5,00" -> 5.0
/// - "5.00" -> 5.0
/// - "100" -> 100.0
pub fn parse_price(price_str: &str) -> Result<f64> {
    let clean_price = price_str.trim().replace(',', ".");
    clean_price
        .parse::<f64>()
        .map_err(|_| SyncError::Parse(price_str.to_string()))
}

/// Rounds `value` to `digits` decimal places, half away from zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Computes the commission-free price for a gross source price.
///
/// Returns `Ok(0.0)` (and logs a warning) for gross prices that are zero,
/// negative or non-finite, and when the resulting net price is not finite. Unparsable text yields [`SyncError::Parse`].
pub fn net_price(gross: &PriceValue, commission_rate_percent: f64, round_digits: u32) -> Result<f64> {
    let gross_price = match gross {
        PriceValue::Number(n) => *n,
        PriceValue::Text(s) => parse_price(s)?,
    };

    if !gross_price.is_finite() || gross_price <= 0.0 {
        warn!("Invalid gross price: {}", gross);
        return Ok(0.0);
    }

    let net = gross_price / (1.0 + commission_rate_percent / 100.0);
    if !net.is_finite() {
        warn!(
            "Net price for {} at {}% commission is not a number",
            gross_price, commission_rate_percent
        );
        return Ok(0.0);
    }
    let rounded = round_to(net, round_digits);
    debug!(
        "Net price for {} at {}% commission: {}",
        gross_price, commission_rate_percent, rounded
    );
    Ok(rounded)
}

/// Whether `proposed` differs from `current` by strictly more than `tolerance`.
pub fn price_changed(current: f64, proposed: f64, tolerance: f64) -> bool {
    (current - proposed).abs() > tolerance + FLOAT_SLACK
}

#[cfg(test)]
#[path = "pricing_tests.rs"]
mod tests;
