//! Small numeric helpers shared across the pricing modules.

/// Calendar days per year used to convert days-to-expiry into a year fraction.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Trading periods per year used to annualize daily realized volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Decimal places reported for prices.
pub const PRICE_DECIMALS: i32 = 2;

/// Decimal places reported for Greeks.
pub const GREEK_DECIMALS: i32 = 4;

/// Decimal places reported for implied volatility percentages.
pub const IV_DECIMALS: i32 = 4;

/// Rounds `value` half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Converts a percentage quote (e.g. `4.919`) into decimal form (`0.04919`).
#[must_use]
pub fn percent_to_decimal(percent: f64) -> f64 {
    percent / 100.0
}
