//! Static terms of a single option contract.
//!
//! [`Contract`] is the only place where user-facing units are normalized:
//! days to expiry become a year fraction and percentage rates become
//! decimals. Every pricer consumes the normalized fields and never divides
//! again.

use super::error::{PricingError, PricingResult};
use super::types::OptionType;
use crate::utils::{DAYS_PER_YEAR, percent_to_decimal};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Raw, user-facing contract terms as they arrive from a caller or a JSON
/// document.
///
/// `rate` and `dividend_yield` are percentages (`4.919` means 4.919%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    /// Underlying spot price.
    pub spot: f64,
    /// Option strike price.
    pub strike: f64,
    /// Calendar days until expiry.
    pub days_to_expiry: f64,
    /// Annualized risk-free rate in percent.
    pub rate: f64,
    /// Annualized continuous dividend yield in percent.
    #[serde(default)]
    pub dividend_yield: f64,
    /// `call` or `put`, case-insensitive.
    pub option_type: String,
    /// Days per year used for the year-fraction conversion.
    #[serde(default = "default_day_count")]
    pub day_count: f64,
}

fn default_day_count() -> f64 {
    DAYS_PER_YEAR
}

impl ContractTerms {
    /// Decodes terms from a JSON document.
    pub fn from_json(data: &str) -> PricingResult<Self> {
        serde_json::from_str(data).map_err(|error| PricingError::Deserialization {
            message: error.to_string(),
        })
    }

    /// Validates and normalizes the terms into a [`Contract`].
    pub fn to_contract(&self) -> PricingResult<Contract> {
        let option_type = self.option_type.parse::<OptionType>()?;
        Contract::with_day_count(
            self.spot,
            self.strike,
            self.days_to_expiry,
            self.day_count,
            self.rate,
            self.dividend_yield,
            option_type,
        )
    }
}

/// An immutable, normalized option contract.
///
/// Volatility is deliberately not part of the contract: it is the unknown
/// of the implied volatility solver and is passed alongside to every pricer.
/// Build one through [`Contract::new`] or [`ContractTerms::to_contract`] so
/// the field checks always run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contract {
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    dividend_yield: f64,
    option_type: OptionType,
}

impl Contract {
    /// Creates a contract from user-facing units.
    ///
    /// # Arguments
    /// - `spot`: Underlying spot price, must be positive
    /// - `strike`: Strike price, must be positive
    /// - `days_to_expiry`: Calendar days to expiry, must be positive
    /// - `rate_pct`: Risk-free rate in percent
    /// - `dividend_yield_pct`: Continuous dividend yield in percent
    /// - `option_type`: Call or Put
    ///
    /// # Errors
    /// `InvalidContract` naming the first offending field.
    pub fn new(
        spot: f64,
        strike: f64,
        days_to_expiry: f64,
        rate_pct: f64,
        dividend_yield_pct: f64,
        option_type: OptionType,
    ) -> PricingResult<Self> {
        Self::with_day_count(
            spot,
            strike,
            days_to_expiry,
            DAYS_PER_YEAR,
            rate_pct,
            dividend_yield_pct,
            option_type,
        )
    }

    /// Creates a call without dividends.
    pub fn call(spot: f64, strike: f64, days_to_expiry: f64, rate_pct: f64) -> PricingResult<Self> {
        Self::new(spot, strike, days_to_expiry, rate_pct, 0.0, OptionType::Call)
    }

    /// Creates a put without dividends.
    pub fn put(spot: f64, strike: f64, days_to_expiry: f64, rate_pct: f64) -> PricingResult<Self> {
        Self::new(spot, strike, days_to_expiry, rate_pct, 0.0, OptionType::Put)
    }

    /// Creates a contract with an explicit day-count basis.
    pub fn with_day_count(
        spot: f64,
        strike: f64,
        days_to_expiry: f64,
        day_count: f64,
        rate_pct: f64,
        dividend_yield_pct: f64,
        option_type: OptionType,
    ) -> PricingResult<Self> {
        require_positive("spot", spot)?;
        require_positive("strike", strike)?;
        require_positive("days_to_expiry", days_to_expiry)?;
        require_positive("day_count", day_count)?;
        require_finite("rate", rate_pct)?;
        require_finite("dividend_yield", dividend_yield_pct)?;

        let contract = Self {
            spot,
            strike,
            time_to_expiry: days_to_expiry / day_count,
            rate: percent_to_decimal(rate_pct),
            dividend_yield: percent_to_decimal(dividend_yield_pct),
            option_type,
        };
        trace!("contract: {:?}", contract);
        Ok(contract)
    }

    /// Underlying spot price (S).
    #[must_use]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike price (K).
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry in years (T).
    #[must_use]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Risk-free rate in decimal form (r).
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Continuous dividend yield in decimal form (q).
    #[must_use]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Call or put.
    #[must_use]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Discount factor `e^{-rT}`.
    #[must_use]
    pub fn rate_discount(&self) -> f64 {
        (-self.rate * self.time_to_expiry).exp()
    }

    /// Dividend discount factor `e^{-qT}`.
    #[must_use]
    pub fn dividend_discount(&self) -> f64 {
        (-self.dividend_yield * self.time_to_expiry).exp()
    }

    /// Calculates the d1 term at volatility `vol`.
    ///
    /// d1 = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
    ///
    /// # Errors
    /// `DomainError` when `vol` is not a positive finite number.
    pub fn d1(&self, vol: f64) -> PricingResult<f64> {
        require_volatility(vol)?;
        let sqrt_time = self.time_to_expiry.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.rate - self.dividend_yield + 0.5 * vol * vol) * self.time_to_expiry)
            / (vol * sqrt_time);
        trace!("d1: {} at vol {}", d1, vol);
        Ok(d1)
    }

    /// Calculates the d2 term at volatility `vol`: d2 = d1 - σ√T.
    pub fn d2(&self, vol: f64) -> PricingResult<f64> {
        Ok(self.d1(vol)? - vol * self.time_to_expiry.sqrt())
    }

    /// Calculates the intrinsic value of the option.
    ///
    /// For calls: max(0, spot - strike)
    /// For puts: max(0, strike - spot)
    #[must_use]
    pub fn intrinsic_value(&self) -> f64 {
        payoff(self.option_type, self.spot, self.strike)
    }

    /// Returns true if the option is in-the-money.
    #[must_use]
    pub fn is_itm(&self) -> bool {
        self.intrinsic_value() > 0.0 && !self.is_atm()
    }

    /// Returns true if the option is at-the-money (within 0.1% of strike).
    #[must_use]
    pub fn is_atm(&self) -> bool {
        (self.spot - self.strike).abs() / self.strike < 0.001
    }

    /// Returns true if the option is out-of-the-money.
    #[must_use]
    pub fn is_otm(&self) -> bool {
        !self.is_itm() && !self.is_atm()
    }
}

/// Exercise value of an option at underlying price `spot`.
#[inline]
pub(crate) fn payoff(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

pub(crate) fn require_volatility(vol: f64) -> PricingResult<()> {
    if vol.is_finite() && vol > 0.0 {
        Ok(())
    } else {
        Err(PricingError::domain(format!(
            "volatility must be positive and finite, got {vol}"
        )))
    }
}

fn require_positive(field: &'static str, value: f64) -> PricingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(
            field,
            format!("must be positive, got {value}"),
        ))
    }
}

fn require_finite(field: &'static str, value: f64) -> PricingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid(field, format!("must be finite, got {value}")))
    }
}
