//! Error types for pricing and implied volatility calculation.

use thiserror::Error;

/// Errors produced by the contract model, the pricers and the solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Structurally invalid input: non-positive spot, strike or expiry,
    /// unknown option type token, non-positive step count, malformed quote.
    #[error("invalid {field}: {message}")]
    InvalidContract {
        /// Name of the offending input.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// Mathematically undefined evaluation for otherwise well-formed input.
    #[error("domain error: {message}")]
    DomainError {
        /// Description of the undefined evaluation.
        message: String,
    },

    /// The implied volatility search diverged or ran out of iterations.
    #[error(
        "solver did not converge after {iterations} iterations, last estimate: {last_estimate:.6}, residual: {residual:.6e}"
    )]
    NonConvergence {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last volatility estimate (decimal form).
        last_estimate: f64,
        /// Model price minus market price at the last evaluated estimate.
        residual: f64,
    },

    /// Contract terms or solver configuration could not be decoded.
    #[error("deserialization failed: {message}")]
    Deserialization {
        /// Underlying decoder message.
        message: String,
    },
}

impl PricingError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        PricingError::InvalidContract {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        PricingError::DomainError {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type PricingResult<T> = Result<T, PricingError>;
