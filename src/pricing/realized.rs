//! Historical (realized) volatility from a series of closing prices.
//!
//! Useful as a first volatility input when no option market exists, or to
//! compare against implied volatility.

use super::error::{PricingError, PricingResult};
use tracing::trace;

/// Continuously compounded returns `ln(P_t / P_{t-1})`.
///
/// # Errors
/// `InvalidContract` on the `closes` field when any price is not positive.
pub fn log_returns(closes: &[f64]) -> PricingResult<Vec<f64>> {
    if let Some(bad) = closes.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(PricingError::invalid(
            "closes",
            format!("prices must be positive, got {bad}"),
        ));
    }
    Ok(closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Annualized sample standard deviation of log returns, in decimal form.
///
/// `periods_per_year` is 252 for daily closes, 52 for weekly, 12 for monthly.
///
/// # Errors
/// `InvalidContract` when fewer than three prices are supplied, a price is
/// not positive, or `periods_per_year` is not positive.
pub fn realized_volatility(closes: &[f64], periods_per_year: f64) -> PricingResult<f64> {
    if closes.len() < 3 {
        return Err(PricingError::invalid(
            "closes",
            format!("need at least 3 prices, got {}", closes.len()),
        ));
    }
    if !(periods_per_year.is_finite() && periods_per_year > 0.0) {
        return Err(PricingError::invalid(
            "periods_per_year",
            format!("must be positive, got {periods_per_year}"),
        ));
    }

    let returns = log_returns(closes)?;
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let vol = (variance * periods_per_year).sqrt();
    trace!("realized vol: {} over {} returns", vol, returns.len());
    Ok(vol)
}
