//! Cox-Ross-Rubinstein binomial lattice pricer.
//!
//! The lattice splits `[0, T]` into `steps` equal intervals with up factor
//! `u = e^(σ√dt)` and down factor `d = 1/u`. Values are rolled back from the
//! `steps + 1` terminal nodes; American exercise compares each continuation
//! value against the immediate exercise value. As `steps` grows the
//! European value converges to [`BlackScholes::fair_value`].
//!
//! Node spots come from a table of `u^k` for `k` in `-steps..=steps`, built
//! once in log space. Cost is `O(steps²)` time and `O(steps)` space: a
//! single value buffer is reused for every backward step. A lattice whose
//! outermost nodes leave the `f64` range is rejected with `DomainError`.
//!
//! [`BlackScholes::fair_value`]: super::BlackScholes::fair_value

use super::contract::{Contract, payoff, require_volatility};
use super::error::{PricingError, PricingResult};
use super::types::ExerciseStyle;
use crate::utils::{PRICE_DECIMALS, round_to};
use serde::Serialize;
use tracing::trace;

/// Binomial tree pricer over a fixed contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinomialPricer {
    contract: Contract,
    steps: usize,
    exercise: ExerciseStyle,
}

/// Per-step lattice constants.
#[derive(Debug)]
struct Lattice {
    log_up: f64,
    probability: f64,
    discount: f64,
}

impl BinomialPricer {
    /// Creates an American-exercise pricer with `steps` time steps.
    ///
    /// # Errors
    /// `InvalidContract` when `steps` is zero or too large to index the lattice.
    pub fn new(contract: Contract, steps: usize) -> PricingResult<Self> {
        if steps < 1 {
            return Err(PricingError::invalid("steps", "must be at least 1, got 0"));
        }
        if i32::try_from(steps).is_err() {
            return Err(PricingError::invalid(
                "steps",
                format!("must not exceed {}, got {steps}", i32::MAX),
            ));
        }
        Ok(Self {
            contract,
            steps,
            exercise: ExerciseStyle::American,
        })
    }

    /// Creates a European-exercise pricer with `steps` time steps.
    pub fn european(contract: Contract, steps: usize) -> PricingResult<Self> {
        Ok(Self::new(contract, steps)?.with_exercise(ExerciseStyle::European))
    }

    /// Sets the exercise style.
    #[must_use]
    pub fn with_exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = exercise;
        self
    }

    /// The priced contract.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Number of time steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Exercise style applied during backward induction.
    #[must_use]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Option value rounded to 2 decimal places.
    pub fn price(&self, vol: f64) -> PricingResult<f64> {
        Ok(round_to(self.fair_value(vol)?, PRICE_DECIMALS))
    }

    /// Unrounded root value of the lattice.
    ///
    /// # Errors
    /// `DomainError` when `vol` is not positive and finite, or when the
    /// lattice implies a risk-neutral probability outside `[0, 1]`.
    pub fn fair_value(&self, vol: f64) -> PricingResult<f64> {
        self.roll_back(vol, self.exercise)
    }

    /// Value of the right to exercise early: American minus European value
    /// on the same lattice.
    pub fn early_exercise_premium(&self, vol: f64) -> PricingResult<f64> {
        let american = self.roll_back(vol, ExerciseStyle::American)?;
        let european = self.roll_back(vol, ExerciseStyle::European)?;
        Ok(american - european)
    }

    fn lattice(&self, vol: f64) -> PricingResult<Lattice> {
        require_volatility(vol)?;

        let dt = self.contract.time_to_expiry() / self.steps as f64;
        let log_up = vol * dt.sqrt();
        let up = log_up.exp();
        let down = 1.0 / up;
        let growth = ((self.contract.rate() - self.contract.dividend_yield()) * dt).exp();
        let probability = (growth - down) / (up - down);
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PricingError::domain(format!(
                "risk-neutral probability {probability} is outside [0, 1]; increase steps or volatility"
            )));
        }

        let span = self.steps as f64 * log_up;
        let lowest = self.contract.spot() * (-span).exp();
        let highest = self.contract.spot() * span.exp();
        if !(lowest > 0.0 && highest.is_finite()) {
            return Err(PricingError::domain(format!(
                "lattice spans e^±{span} around spot; reduce steps or volatility"
            )));
        }

        let lattice = Lattice {
            log_up,
            probability,
            discount: (-self.contract.rate() * dt).exp(),
        };
        trace!("lattice: {:?}", lattice);
        Ok(lattice)
    }

    fn roll_back(&self, vol: f64, exercise: ExerciseStyle) -> PricingResult<f64> {
        let lattice = self.lattice(vol)?;
        let option_type = self.contract.option_type();
        let spot = self.contract.spot();
        let strike = self.contract.strike();
        let steps = self.steps;

        let disc_up = lattice.discount * lattice.probability;
        let disc_down = lattice.discount * (1.0 - lattice.probability);

        // node j at step i sits at spot · u^(2j - i), stored at index steps + 2j - i
        let node_spots: Vec<f64> = (0..=2 * steps)
            .map(|k| spot * ((k as f64 - steps as f64) * lattice.log_up).exp())
            .collect();

        let mut values: Vec<f64> = (0..=steps)
            .map(|j| payoff(option_type, node_spots[2 * j], strike))
            .collect();

        let american = exercise == ExerciseStyle::American;
        for step in (0..steps).rev() {
            let offset = steps - step;
            for j in 0..=step {
                let continuation = disc_up * values[j + 1] + disc_down * values[j];
                values[j] = if american {
                    continuation.max(payoff(option_type, node_spots[offset + 2 * j], strike))
                } else {
                    continuation
                };
            }
        }

        let value = values[0];
        trace!(
            "binomial value: {} ({:?}, {} steps, vol {})",
            value, exercise, steps, vol
        );
        Ok(value)
    }
}
