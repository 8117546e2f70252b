//! Black-Scholes-Merton pricing model and Greeks calculation.
//!
//! Every public function takes a [`Contract`] plus a volatility in decimal
//! form and is a pure function of those inputs. `d1`/`d2` are recomputed on
//! each call because the solver varies volatility between calls.
//!
//! Rounded variants (`price`, `delta`, ..., `greeks`) report 2 decimals for
//! prices and 4 for Greeks. `fair_value`, `raw_greeks` and `vega_per_unit`
//! return full precision.

use super::contract::Contract;
use super::error::PricingResult;
use super::types::{Greeks, OptionType};
use crate::utils::{DAYS_PER_YEAR, GREEK_DECIMALS, PRICE_DECIMALS, round_to};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use tracing::trace;

/// Black-Scholes-Merton pricing model implementation.
pub struct BlackScholes;

/// Intermediate quantities shared by the price and every Greek.
struct Evaluation {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    dividend: f64,
    vol: f64,
    sqrt_time: f64,
    d1: f64,
    d2: f64,
    rate_discount: f64,
    dividend_discount: f64,
    option_type: OptionType,
}

impl Evaluation {
    fn new(contract: &Contract, vol: f64) -> PricingResult<Self> {
        let d1 = contract.d1(vol)?;
        let sqrt_time = contract.time_to_expiry().sqrt();
        Ok(Self {
            spot: contract.spot(),
            strike: contract.strike(),
            time: contract.time_to_expiry(),
            rate: contract.rate(),
            dividend: contract.dividend_yield(),
            vol,
            sqrt_time,
            d1,
            d2: d1 - vol * sqrt_time,
            rate_discount: contract.rate_discount(),
            dividend_discount: contract.dividend_discount(),
            option_type: contract.option_type(),
        })
    }

    fn call_value(&self) -> f64 {
        self.spot * self.dividend_discount * BlackScholes::norm_cdf(self.d1)
            - self.strike * self.rate_discount * BlackScholes::norm_cdf(self.d2)
    }

    fn fair_value(&self) -> f64 {
        let call = self.call_value();
        match self.option_type {
            OptionType::Call => call,
            // put-call parity: P = C - S·e^{-qT} + K·e^{-rT}
            OptionType::Put => {
                call - self.spot * self.dividend_discount + self.strike * self.rate_discount
            }
        }
    }

    fn delta(&self) -> f64 {
        let nd1 = BlackScholes::norm_cdf(self.d1);
        match self.option_type {
            OptionType::Call => self.dividend_discount * nd1,
            OptionType::Put => self.dividend_discount * (nd1 - 1.0),
        }
    }

    fn gamma(&self) -> f64 {
        BlackScholes::norm_pdf(self.d1) * self.dividend_discount
            / (self.spot * self.vol * self.sqrt_time)
    }

    fn vega_per_unit(&self) -> f64 {
        self.spot * self.dividend_discount * self.sqrt_time * BlackScholes::norm_pdf(self.d1)
    }

    fn theta(&self) -> f64 {
        let decay = -self.spot * self.dividend_discount * BlackScholes::norm_pdf(self.d1) * self.vol
            / (2.0 * self.sqrt_time);

        let theta_annual = match self.option_type {
            OptionType::Call => {
                decay - self.rate * self.strike * self.rate_discount * BlackScholes::norm_cdf(self.d2)
                    + self.dividend
                        * self.spot
                        * self.dividend_discount
                        * BlackScholes::norm_cdf(self.d1)
            }
            OptionType::Put => {
                decay
                    + self.rate * self.strike * self.rate_discount * BlackScholes::norm_cdf(-self.d2)
                    - self.dividend
                        * self.spot
                        * self.dividend_discount
                        * BlackScholes::norm_cdf(-self.d1)
            }
        };

        theta_annual / DAYS_PER_YEAR
    }

    fn rho(&self) -> f64 {
        let scale = self.strike / 100.0 * self.time * self.rate_discount;
        match self.option_type {
            OptionType::Call => scale * BlackScholes::norm_cdf(self.d2),
            OptionType::Put => -scale * BlackScholes::norm_cdf(-self.d2),
        }
    }

    fn vanna(&self) -> f64 {
        -0.01 * self.dividend_discount * BlackScholes::norm_pdf(self.d1) * self.d2 / self.vol
    }
}

impl BlackScholes {
    /// Standard normal cumulative distribution function.
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        Normal::standard().cdf(x)
    }

    /// Standard normal probability density function.
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        Normal::standard().pdf(x)
    }

    /// Unrounded theoretical option value.
    ///
    /// For calls: C = S·e^(-qT)·N(d1) - K·e^(-rT)·N(d2)
    /// For puts:  derived from the call via put-call parity
    ///
    /// # Errors
    /// `DomainError` when `vol` is not positive and finite.
    pub fn fair_value(contract: &Contract, vol: f64) -> PricingResult<f64> {
        let value = Evaluation::new(contract, vol)?.fair_value();
        trace!("bsm fair value: {} at vol {}", value, vol);
        Ok(value)
    }

    /// Theoretical option value rounded to 2 decimal places.
    pub fn price(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(round_to(Self::fair_value(contract, vol)?, PRICE_DECIMALS))
    }

    /// Delta (∂price/∂S): `e^(-qT)·N(d1)` for calls, `e^(-qT)·(N(d1) - 1)` for puts.
    pub fn delta(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(round_to(Evaluation::new(contract, vol)?.delta(), GREEK_DECIMALS))
    }

    /// Gamma (∂²price/∂S²). Identical for calls and puts, never negative.
    pub fn gamma(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(round_to(Evaluation::new(contract, vol)?.gamma(), GREEK_DECIMALS))
    }

    /// Vega per 1 vol point: `(S/100)·e^(-qT)·√T·N'(d1)`.
    pub fn vega(contract: &Contract, vol: f64) -> PricingResult<f64> {
        let vega = Evaluation::new(contract, vol)?.vega_per_unit() / 100.0;
        Ok(round_to(vega, GREEK_DECIMALS))
    }

    /// Unrounded vega per unit of volatility, `S·e^(-qT)·√T·N'(d1)`.
    ///
    /// This is the true derivative ∂price/∂σ used by the Newton-Raphson
    /// solver; it is 100 times the quoted [`BlackScholes::vega`].
    pub fn vega_per_unit(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(Evaluation::new(contract, vol)?.vega_per_unit())
    }

    /// Theta per calendar day. Negative for most long positions.
    pub fn theta(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(round_to(Evaluation::new(contract, vol)?.theta(), GREEK_DECIMALS))
    }

    /// Rho per 1% change in the risk-free rate.
    pub fn rho(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(round_to(Evaluation::new(contract, vol)?.rho(), GREEK_DECIMALS))
    }

    /// Vanna: change in delta per 1 vol point.
    pub fn vanna(contract: &Contract, vol: f64) -> PricingResult<f64> {
        Ok(round_to(Evaluation::new(contract, vol)?.vanna(), GREEK_DECIMALS))
    }

    /// All Greeks at full precision, sharing one `d1`/`d2` evaluation.
    pub fn raw_greeks(contract: &Contract, vol: f64) -> PricingResult<Greeks> {
        let eval = Evaluation::new(contract, vol)?;
        let greeks = Greeks {
            delta: eval.delta(),
            gamma: eval.gamma(),
            vega: eval.vega_per_unit() / 100.0,
            theta: eval.theta(),
            rho: eval.rho(),
            vanna: eval.vanna(),
        };
        trace!("greeks: {:?}", greeks);
        Ok(greeks)
    }

    /// All Greeks rounded to 4 decimal places.
    pub fn greeks(contract: &Contract, vol: f64) -> PricingResult<Greeks> {
        Ok(Self::raw_greeks(contract, vol)?.rounded())
    }
}
