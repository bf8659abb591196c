//! Currency validation and conversion arithmetic

use super::error::{RateError, RateResult};
use super::rates::RateSnapshot;
use std::fmt::Display;

/// Outcome of a conversion, ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub converted: f64,
    pub rate: f64,
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Float formatting rounds the exact binary value, ties to even.
        write!(
            f,
            "{:.2} {} = {:.2} {}",
            self.amount, self.from, self.converted, self.to
        )
    }
}

/// Looks up the rate for `target` in the snapshot.
pub fn validate_currency(snapshot: &RateSnapshot, target: &str) -> RateResult<f64> {
    snapshot
        .rate(target)
        .ok_or_else(|| RateError::CurrencyNotFound(target.to_string()))
}

pub fn convert(rate: f64, amount: f64) -> f64 {
    amount * rate
}

/// Validates the target currency against a snapshot and converts `amount`.
pub fn convert_with(
    snapshot: &RateSnapshot,
    target: &str,
    amount: f64,
) -> RateResult<ConversionResult> {
    let rate = validate_currency(snapshot, target)?;
    Ok(ConversionResult {
        from: snapshot.base_currency().to_string(),
        to: target.to_string(),
        amount,
        converted: convert(rate, amount),
        rate,
    })
}
