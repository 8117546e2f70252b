//! Value types shared by the pricers and the solver.

use super::error::PricingError;
use crate::utils::{GREEK_DECIMALS, IV_DECIMALS, round_to};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

impl FromStr for OptionType {
    type Err = PricingError;

    /// Parses a case-insensitive `call`/`put` token (`c`/`p` accepted).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::invalid(
                "option_type",
                format!("expected `call` or `put`, got `{other}`"),
            )),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Exercise style honoured by the binomial lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseStyle {
    /// Exercise only at expiry.
    European,
    /// Exercise at any node of the lattice.
    #[default]
    American,
}

/// Price source for IV calculation from a market quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// Simple mid price: `(bid + ask) / 2`.
    #[default]
    MidPrice,
    /// Size-weighted mid price based on quantities at bid/ask.
    WeightedMid,
    /// Last traded price.
    LastTrade,
}

/// IV calculation quality indicator based on liquidity.
///
/// Quality is determined by the bid-ask spread at calculation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IvQuality {
    /// Spread < 100 bps (1%), high liquidity.
    High,
    /// Spread 100-500 bps (1-5%), moderate liquidity.
    Medium,
    /// Spread > 500 bps (5%), low liquidity.
    Low,
}

impl IvQuality {
    /// Classifies a bid-ask spread expressed in basis points of the mid.
    #[must_use]
    pub fn from_spread_bps(spread_bps: f64) -> Self {
        if spread_bps < 100.0 {
            IvQuality::High
        } else if spread_bps <= 500.0 {
            IvQuality::Medium
        } else {
            IvQuality::Low
        }
    }
}

/// First and second order sensitivities of an option.
///
/// Scaling conventions:
/// - `vega`: price change per 1 vol point (1%).
/// - `theta`: price change per calendar day.
/// - `rho`: price change per 1% change in rate.
/// - `vanna`: change in delta per 1 vol point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Sensitivity to the underlying price.
    pub delta: f64,
    /// Sensitivity of delta to the underlying price.
    pub gamma: f64,
    /// Sensitivity to volatility, per 1% vol.
    pub vega: f64,
    /// Time decay per calendar day.
    pub theta: f64,
    /// Sensitivity to the risk-free rate, per 1% rate.
    pub rho: f64,
    /// Sensitivity of delta to volatility, per 1% vol.
    pub vanna: f64,
}

impl Greeks {
    /// Returns a copy with every Greek rounded to 4 decimal places.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            delta: round_to(self.delta, GREEK_DECIMALS),
            gamma: round_to(self.gamma, GREEK_DECIMALS),
            vega: round_to(self.vega, GREEK_DECIMALS),
            theta: round_to(self.theta, GREEK_DECIMALS),
            rho: round_to(self.rho, GREEK_DECIMALS),
            vanna: round_to(self.vanna, GREEK_DECIMALS),
        }
    }

    /// Greek name to value mapping, ordered by name.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("delta", self.delta),
            ("gamma", self.gamma),
            ("vega", self.vega),
            ("theta", self.theta),
            ("rho", self.rho),
            ("vanna", self.vanna),
        ])
    }
}

/// Result of an implied volatility calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvResult {
    /// Implied volatility in decimal form (e.g. 0.25 = 25%).
    pub iv: f64,
    /// Market price the solver matched.
    pub price_used: f64,
    /// Number of pricer evaluations performed.
    pub iterations: u32,
    /// Model price minus market price at `iv`.
    pub residual: f64,
    /// Bid-ask spread in basis points, when the price came from a quote.
    pub spread_bps: Option<f64>,
    /// Liquidity quality, when the price came from a quote.
    pub quality: Option<IvQuality>,
}

impl IvResult {
    /// Creates a new IV result without quote metadata.
    #[must_use]
    pub fn new(iv: f64, price_used: f64, iterations: u32, residual: f64) -> Self {
        Self {
            iv,
            price_used,
            iterations,
            residual,
            spread_bps: None,
            quality: None,
        }
    }

    /// Attaches spread and quality metadata.
    #[must_use]
    pub fn with_spread(mut self, spread_bps: f64) -> Self {
        self.spread_bps = Some(spread_bps);
        self.quality = Some(IvQuality::from_spread_bps(spread_bps));
        self
    }

    /// Returns the IV as a percentage rounded to 4 decimals (e.g. 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        round_to(self.iv * 100.0, IV_DECIMALS)
    }

    /// Returns true if the calculation quality is acceptable (High or Medium).
    /// Results without quote metadata are treated as acceptable.
    #[must_use]
    pub fn is_acceptable_quality(&self) -> bool {
        !matches!(self.quality, Some(IvQuality::Low))
    }
}
