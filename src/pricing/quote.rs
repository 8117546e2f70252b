//! Market price extraction from a bid/ask quote.
//!
//! For a specific strike and expiry a venue provides:
//! - Best bid (e.g., $4.50)
//! - Best ask (e.g., $4.70)
//!
//! The "market price" fed to the solver is typically the mid:
//! `(bid + ask) / 2 = $4.60`. The spread relative to the mid grades how far
//! the resulting implied volatility can be trusted.

use super::contract::Contract;
use super::error::{PricingError, PricingResult};
use super::solver::{SolverConfig, solve_iv};
use super::types::{IvResult, PriceSource};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Top-of-book quote for a single option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Best bid price.
    pub bid: f64,
    /// Best ask price.
    pub ask: f64,
    /// Quantity at the best bid.
    #[serde(default)]
    pub bid_size: f64,
    /// Quantity at the best ask.
    #[serde(default)]
    pub ask_size: f64,
    /// Last traded price, if any.
    #[serde(default)]
    pub last: Option<f64>,
}

impl MarketQuote {
    /// Creates a quote without sizes or last trade.
    ///
    /// # Errors
    /// `InvalidContract` on the `quote` field when the bid is negative, the
    /// ask is not positive, or the book is crossed.
    pub fn new(bid: f64, ask: f64) -> PricingResult<Self> {
        if !(bid.is_finite() && bid >= 0.0) {
            return Err(PricingError::invalid(
                "quote",
                format!("bid must be non-negative, got {bid}"),
            ));
        }
        if !(ask.is_finite() && ask > 0.0) {
            return Err(PricingError::invalid(
                "quote",
                format!("ask must be positive, got {ask}"),
            ));
        }
        if ask < bid {
            return Err(PricingError::invalid(
                "quote",
                format!("crossed quote: bid {bid} above ask {ask}"),
            ));
        }
        Ok(Self {
            bid,
            ask,
            bid_size: 0.0,
            ask_size: 0.0,
            last: None,
        })
    }

    /// Sets the quantities at bid and ask.
    #[must_use]
    pub fn with_sizes(mut self, bid_size: f64, ask_size: f64) -> Self {
        self.bid_size = bid_size;
        self.ask_size = ask_size;
        self
    }

    /// Sets the last traded price.
    #[must_use]
    pub fn with_last(mut self, last: f64) -> Self {
        self.last = Some(last);
        self
    }

    /// Simple mid price.
    #[must_use]
    pub fn mid(&self) -> f64 {
        let mid = 0.5 * (self.bid + self.ask);
        trace!("mid: {}", mid);
        mid
    }

    /// Size-weighted mid: leans toward the side with less quantity.
    ///
    /// Falls back to the simple mid when no sizes are known.
    #[must_use]
    pub fn weighted_mid(&self) -> f64 {
        let total = self.bid_size + self.ask_size;
        if total <= 0.0 {
            return self.mid();
        }
        let weighted = (self.bid * self.ask_size + self.ask * self.bid_size) / total;
        trace!("weighted_mid: {}", weighted);
        weighted
    }

    /// Spread in basis points of the mid price.
    #[must_use]
    pub fn spread_bps(&self) -> f64 {
        (self.ask - self.bid) / self.mid() * 10_000.0
    }

    /// Price according to `source`.
    ///
    /// # Errors
    /// `InvalidContract` when `LastTrade` is requested but no trade is known.
    pub fn price(&self, source: PriceSource) -> PricingResult<f64> {
        match source {
            PriceSource::MidPrice => Ok(self.mid()),
            PriceSource::WeightedMid => Ok(self.weighted_mid()),
            PriceSource::LastTrade => self
                .last
                .ok_or_else(|| PricingError::invalid("quote", "no last trade available")),
        }
    }
}

/// Solves implied volatility from a quote, tagging the result with the
/// spread and liquidity quality.
pub fn solve_iv_from_quote(
    contract: &Contract,
    quote: &MarketQuote,
    source: PriceSource,
    config: &SolverConfig,
) -> PricingResult<IvResult> {
    let price = quote.price(source)?;
    Ok(solve_iv(contract, price, config)?.with_spread(quote.spread_bps()))
}
