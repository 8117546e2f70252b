//! Newton-Raphson solver for implied volatility calculation.
//!
//! The solver finds the volatility that makes the chosen pricer reproduce an
//! observed market price. Each iteration re-evaluates the model price and
//! the per-unit vega at the current estimate. The search stops as soon as
//! the absolute residual drops below the tolerance.
//!
//! Estimates are kept inside `[min_iv, max_iv]`. Steps are capped at 0.5
//! volatility units, and where vega is too flat to trust the estimate is
//! scaled by 0.9 or 1.1 instead. The search fails with
//! [`PricingError::NonConvergence`] when a step is not finite, when it is
//! pinned against a bound, or when the iteration budget runs out.

use super::binomial::BinomialPricer;
use super::black_scholes::BlackScholes;
use super::contract::Contract;
use super::error::{PricingError, PricingResult};
use super::types::{ExerciseStyle, IvResult, OptionType};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, trace, warn};

/// Largest volatility change a single Newton step may take.
const MAX_NEWTON_STEP: f64 = 0.5;

/// Pricing routine driven by the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnerPricer {
    /// Closed-form Black-Scholes-Merton (European exercise).
    #[default]
    Analytic,
    /// Cox-Ross-Rubinstein lattice; slower, but honours early exercise.
    Binomial {
        /// Lattice time steps.
        steps: usize,
        /// Exercise style applied on the lattice.
        exercise: ExerciseStyle,
    },
}

impl InnerPricer {
    /// Exercise style implied by the pricer.
    #[must_use]
    pub fn exercise(&self) -> ExerciseStyle {
        match self {
            InnerPricer::Analytic => ExerciseStyle::European,
            InnerPricer::Binomial { exercise, .. } => *exercise,
        }
    }

    fn fair_value(&self, contract: &Contract, vol: f64) -> PricingResult<f64> {
        match self {
            InnerPricer::Analytic => BlackScholes::fair_value(contract, vol),
            InnerPricer::Binomial { steps, exercise } => BinomialPricer::new(*contract, *steps)?
                .with_exercise(*exercise)
                .fair_value(vol),
        }
    }
}

/// Configuration for the implied volatility solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum iterations before giving up.
    pub max_iterations: u32,
    /// Convergence tolerance on `|model price - market price|`.
    pub tolerance: f64,
    /// Starting volatility; `None` uses the closed-form seed.
    pub initial_guess: Option<f64>,
    /// Lowest volatility estimate, and lower end of the bisection bracket.
    pub min_iv: f64,
    /// Highest volatility estimate, and upper end of the bisection bracket.
    pub max_iv: f64,
    /// Per-unit vega below which a geometric step replaces the Newton step.
    pub min_vega: f64,
    /// Retry with bisection when Newton-Raphson fails to converge.
    pub bisection_fallback: bool,
    /// Pricing routine to invert.
    pub pricer: InnerPricer,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-5,
            initial_guess: None,
            min_iv: 1e-4,
            max_iv: 5.0,
            min_vega: 1e-8,
            bisection_fallback: false,
            pricer: InnerPricer::Analytic,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a configuration from JSON; missing fields keep their defaults.
    pub fn from_json(data: &str) -> PricingResult<Self> {
        serde_json::from_str(data).map_err(|error| PricingError::Deserialization {
            message: error.to_string(),
        })
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the initial volatility guess (decimal form).
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = Some(initial_guess);
        self
    }

    /// Sets the volatility bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_iv: f64, max_iv: f64) -> Self {
        self.min_iv = min_iv;
        self.max_iv = max_iv;
        self
    }

    /// Sets the minimum usable vega.
    #[must_use]
    pub fn with_min_vega(mut self, min_vega: f64) -> Self {
        self.min_vega = min_vega;
        self
    }

    /// Enables or disables the bisection retry.
    #[must_use]
    pub fn with_bisection_fallback(mut self, enabled: bool) -> Self {
        self.bisection_fallback = enabled;
        self
    }

    /// Sets the pricing routine to invert.
    #[must_use]
    pub fn with_pricer(mut self, pricer: InnerPricer) -> Self {
        self.pricer = pricer;
        self
    }

    fn validate(&self) -> PricingResult<()> {
        if self.max_iterations == 0 {
            return Err(PricingError::invalid(
                "max_iterations",
                "must be at least 1, got 0",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PricingError::invalid(
                "tolerance",
                format!("must be positive, got {}", self.tolerance),
            ));
        }
        if !(self.min_iv > 0.0 && self.min_iv < self.max_iv && self.max_iv.is_finite()) {
            return Err(PricingError::invalid(
                "max_iv",
                format!(
                    "bounds must satisfy 0 < min_iv < max_iv, got [{}, {}]",
                    self.min_iv, self.max_iv
                ),
            ));
        }
        if let InnerPricer::Binomial { steps: 0, .. } = self.pricer {
            return Err(PricingError::invalid("steps", "must be at least 1, got 0"));
        }
        Ok(())
    }
}

/// Closed-form starting guess `σ₀ = √(2π/T) · price / S`.
#[must_use]
pub fn seed_volatility(contract: &Contract, market_price: f64) -> f64 {
    (2.0 * PI / contract.time_to_expiry()).sqrt() * market_price / contract.spot()
}

/// Rejects market prices outside the no-arbitrage band of the contract.
///
/// European bounds:
/// - call: `max(0, S·e^(-qT) - K·e^(-rT)) < price < S·e^(-qT)`
/// - put:  `max(0, K·e^(-rT) - S·e^(-qT)) < price < K·e^(-rT)`
///
/// American bounds additionally floor at intrinsic value and cap at `S`
/// (call) or `K` (put).
///
/// # Errors
/// `InvalidContract` on the `market_price` field.
pub fn check_price_bounds(
    contract: &Contract,
    market_price: f64,
    exercise: ExerciseStyle,
) -> PricingResult<()> {
    if !(market_price.is_finite() && market_price > 0.0) {
        return Err(PricingError::invalid(
            "market_price",
            format!("must be positive, got {market_price}"),
        ));
    }

    let discounted_spot = contract.spot() * contract.dividend_discount();
    let discounted_strike = contract.strike() * contract.rate_discount();
    let (european_floor, european_cap) = match contract.option_type() {
        OptionType::Call => ((discounted_spot - discounted_strike).max(0.0), discounted_spot),
        OptionType::Put => ((discounted_strike - discounted_spot).max(0.0), discounted_strike),
    };

    let (lower, upper) = match exercise {
        ExerciseStyle::European => (european_floor, european_cap),
        ExerciseStyle::American => {
            let cap = match contract.option_type() {
                OptionType::Call => contract.spot(),
                OptionType::Put => contract.strike(),
            };
            (european_floor.max(contract.intrinsic_value()), cap)
        }
    };

    if market_price <= lower {
        return Err(PricingError::invalid(
            "market_price",
            format!("{market_price:.4} is at or below the no-arbitrage floor {lower:.4}"),
        ));
    }
    if market_price >= upper {
        return Err(PricingError::invalid(
            "market_price",
            format!("{market_price:.4} is at or above the no-arbitrage cap {upper:.4}"),
        ));
    }
    Ok(())
}

/// Solves for implied volatility using Newton-Raphson.
///
/// σ_{n+1} = σ_n - (price(σ_n) - market_price) / vega(σ_n)
///
/// where `vega` is the unscaled analytic derivative ∂price/∂σ, recomputed at
/// every estimate. Each step is capped at ±0.5 and the estimate is clamped to
/// `[min_iv, max_iv]`. With [`InnerPricer::Binomial`] the lattice supplies
/// the price while the analytic vega still drives the step.
///
/// # Arguments
/// - `contract`: Option terms
/// - `market_price`: Observed price to match (commonly the bid/ask mid)
/// - `config`: Solver configuration
///
/// # Returns
/// - `Ok(IvResult)`: Converged volatility (decimal) with diagnostics
/// - `Err(PricingError)`: Invalid config or price bounds, or non-convergence
///
/// # Example
/// ```
/// use optionpricer::pricing::{Contract, SolverConfig, solve_iv};
///
/// let contract = Contract::put(18.05, 15.0, 159.0, 0.05198).unwrap();
/// let result = solve_iv(&contract, 1.25, &SolverConfig::default()).unwrap();
/// assert!(result.iv_percent() > 0.0);
/// ```
pub fn solve_iv(
    contract: &Contract,
    market_price: f64,
    config: &SolverConfig,
) -> PricingResult<IvResult> {
    config.validate()?;
    check_price_bounds(contract, market_price, config.pricer.exercise())?;

    match newton_raphson(contract, market_price, config) {
        Err(PricingError::NonConvergence {
            iterations,
            last_estimate,
            residual,
        }) if config.bisection_fallback => {
            warn!(
                "newton-raphson stopped after {} iterations (estimate {}, residual {}), retrying with bisection",
                iterations, last_estimate, residual
            );
            bisection(contract, market_price, config)
        }
        outcome => outcome,
    }
}

fn newton_raphson(
    contract: &Contract,
    market_price: f64,
    config: &SolverConfig,
) -> PricingResult<IvResult> {
    let seed = config
        .initial_guess
        .unwrap_or_else(|| seed_volatility(contract, market_price));
    if !seed.is_finite() {
        return Err(PricingError::NonConvergence {
            iterations: 0,
            last_estimate: seed,
            residual: f64::NAN,
        });
    }
    let mut vol = seed.clamp(config.min_iv, config.max_iv);

    let mut residual = f64::NAN;
    for iteration in 1..=config.max_iterations {
        residual = config.pricer.fair_value(contract, vol)? - market_price;
        debug!(
            "newton iteration {}: vol {} residual {}",
            iteration, vol, residual
        );

        if residual.abs() < config.tolerance {
            return Ok(IvResult::new(vol, market_price, iteration, residual));
        }

        let vega = BlackScholes::vega_per_unit(contract, vol)?;
        let next = if vega.is_finite() && vega >= config.min_vega {
            vol - (residual / vega).clamp(-MAX_NEWTON_STEP, MAX_NEWTON_STEP)
        } else {
            // flat price curve: walk toward the root geometrically
            trace!("vega {} below {} at vol {}", vega, config.min_vega, vol);
            if residual > 0.0 {
                vol * 0.9
            } else {
                vol * 1.1
            }
        };

        if !next.is_finite() {
            warn!("newton step from {} produced {}", vol, next);
            return Err(PricingError::NonConvergence {
                iterations: iteration,
                last_estimate: vol,
                residual,
            });
        }

        let next = next.clamp(config.min_iv, config.max_iv);
        if next == vol {
            warn!(
                "newton step pinned at bound {} (residual {}), no root in [{}, {}]",
                vol, residual, config.min_iv, config.max_iv
            );
            return Err(PricingError::NonConvergence {
                iterations: iteration,
                last_estimate: vol,
                residual,
            });
        }
        if iteration == config.max_iterations {
            break;
        }
        vol = next;
    }

    warn!(
        "iteration budget of {} exhausted at vol {}",
        config.max_iterations, vol
    );
    Err(PricingError::NonConvergence {
        iterations: config.max_iterations,
        last_estimate: vol,
        residual,
    })
}

/// Solves for implied volatility by bisection over `[min_iv, max_iv]`.
///
/// Slower than Newton-Raphson but only relies on the price being monotone
/// in volatility.
///
/// # Errors
/// `NonConvergence` when the market price is not bracketed by the bounds or
/// the iteration budget runs out.
pub fn solve_iv_bisection(
    contract: &Contract,
    market_price: f64,
    config: &SolverConfig,
) -> PricingResult<IvResult> {
    config.validate()?;
    check_price_bounds(contract, market_price, config.pricer.exercise())?;
    bisection(contract, market_price, config)
}

fn bisection(
    contract: &Contract,
    market_price: f64,
    config: &SolverConfig,
) -> PricingResult<IvResult> {
    let mut low = config.min_iv;
    let mut high = config.max_iv;

    let price_high = config.pricer.fair_value(contract, high)?;
    if market_price > price_high {
        return Err(PricingError::NonConvergence {
            iterations: 0,
            last_estimate: high,
            residual: price_high - market_price,
        });
    }

    let mut mid = 0.5 * (low + high);
    let mut residual = f64::NAN;
    for iteration in 1..=config.max_iterations {
        mid = 0.5 * (low + high);
        residual = config.pricer.fair_value(contract, mid)? - market_price;
        debug!(
            "bisection iteration {}: vol {} residual {}",
            iteration, mid, residual
        );

        if residual.abs() < config.tolerance {
            return Ok(IvResult::new(mid, market_price, iteration, residual));
        }

        if residual > 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    warn!(
        "bisection budget of {} exhausted at vol {}",
        config.max_iterations, mid
    );
    Err(PricingError::NonConvergence {
        iterations: config.max_iterations,
        last_estimate: mid,
        residual,
    })
}

/// Implied volatility as a percentage rounded to 4 decimals.
pub fn implied_vol_percent(
    contract: &Contract,
    market_price: f64,
    config: &SolverConfig,
) -> PricingResult<f64> {
    Ok(solve_iv(contract, market_price, config)?.iv_percent())
}
