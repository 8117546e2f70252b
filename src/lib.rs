//! # optionpricer
//!
//! Option valuation and volatility calibration for single-underlying
//! equity options.
//!
//! The crate has four building blocks, each a pure function of its inputs:
//!
//! - [`Contract`](pricing::Contract): the static terms of one option. Raw
//!   user-facing units (days to expiry, percentage rates) are normalized here
//!   and nowhere else.
//! - [`BlackScholes`](pricing::BlackScholes): closed-form Black-Scholes-Merton
//!   fair value and Greeks (delta, gamma, vega, theta, rho, vanna).
//! - [`BinomialPricer`](pricing::BinomialPricer): Cox-Ross-Rubinstein lattice
//!   with optional early exercise.
//! - [`solve_iv`](pricing::solve_iv): Newton-Raphson implied volatility with
//!   explicit failure on divergence, stalled derivatives and exhausted budgets.
//!
//! Supporting pieces extract a market price from a bid/ask quote and compute
//! realized volatility from a close-price series.
//!
//! ## Units
//!
//! | Quantity        | Input form          | Internal form |
//! |-----------------|---------------------|---------------|
//! | time to expiry  | days                | years (÷365)  |
//! | rate, dividend  | percent (`4.919`)   | decimal       |
//! | volatility      | decimal (`0.592`)   | decimal       |
//!
//! Prices are reported to 2 decimals, Greeks to 4 and implied volatility as a
//! percentage with 4 decimals. Raw (unrounded) variants exist for callers that
//! need full precision.
//!
//! ## Example
//!
//! ```
//! use optionpricer::prelude::*;
//!
//! let contract = Contract::put(17.31, 17.5, 167.0, 4.919).unwrap();
//! let price = BlackScholes::price(&contract, 0.592).unwrap();
//! assert_eq!(price, 2.63);
//!
//! let american = BinomialPricer::new(contract, 500).unwrap().price(0.592).unwrap();
//! assert!(american >= price);
//!
//! let result = solve_iv(&contract, 2.63, &SolverConfig::default()).unwrap();
//! assert!((result.iv - 0.592).abs() < 1e-2);
//! ```

pub mod pricing;
pub mod utils;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::pricing::{
        BinomialPricer, BlackScholes, Contract, ContractTerms, ExerciseStyle, Greeks, InnerPricer,
        IvQuality, IvResult, MarketQuote, OptionType, PriceSource, PricingError, PricingResult,
        SolverConfig, implied_vol_percent, log_returns, realized_volatility, solve_iv,
        solve_iv_bisection, solve_iv_from_quote,
    };
}
