//! Option pricing and implied volatility calculation.
//!
//! # Overview
//!
//! Implied Volatility (IV) is the option's "price" translated into different
//! units. The price of an option in USD and the IV in % are the same
//! information in different units.
//!
//! - [`Contract`] normalizes raw terms once.
//! - [`BlackScholes`] gives closed-form European values and Greeks.
//! - [`BinomialPricer`] rolls back a CRR lattice, with early exercise when asked.
//! - [`solve_iv`] inverts either pricer with Newton-Raphson.
//!
//! # Black-Scholes Inversion
//!
//! Since there's no analytical solution to invert Black-Scholes, the solver
//! uses Newton-Raphson root finding driven by the analytic vega. It usually
//! converges in 3-5 iterations near the money. Out-of-the-money seeds often
//! start where vega is nearly flat; the solver then walks the estimate
//! geometrically until Newton steps take over. A root outside the configured
//! bounds fails with [`PricingError::NonConvergence`].
//!
//! # Example
//!
//! ```
//! use optionpricer::pricing::{Contract, MarketQuote, PriceSource, SolverConfig, solve_iv_from_quote};
//!
//! let contract = Contract::put(18.05, 15.0, 159.0, 0.05198).unwrap();
//! let quote = MarketQuote::new(1.20, 1.30).unwrap();
//! let result = solve_iv_from_quote(&contract, &quote, PriceSource::MidPrice, &SolverConfig::default()).unwrap();
//! println!("IV: {:.2}%", result.iv_percent());
//! ```

mod binomial;
mod black_scholes;
mod contract;
mod error;
mod quote;
mod realized;
mod solver;
mod types;

pub use binomial::BinomialPricer;
pub use black_scholes::BlackScholes;
pub use contract::{Contract, ContractTerms};
pub use error::{PricingError, PricingResult};
pub use quote::{MarketQuote, solve_iv_from_quote};
pub use realized::{log_returns, realized_volatility};
pub use solver::{
    InnerPricer, SolverConfig, check_price_bounds, implied_vol_percent, seed_volatility, solve_iv,
    solve_iv_bisection,
};
pub use types::{ExerciseStyle, Greeks, IvQuality, IvResult, OptionType, PriceSource};
