//! Example pricing one contract end to end
//!
//! This example shows how to:
//! 1. Decode contract terms and solver settings from JSON
//! 2. Price the contract with Black-Scholes-Merton and report its Greeks
//! 3. Compare European and American values on a binomial lattice
//! 4. Recover implied volatility from a bid/ask quote
//!
//! Usage: `price_contract [terms.json] [volatility]`

use optionpricer::prelude::*;
use serde::Serialize;
use std::fs;
use tracing::{info, warn};

const DEFAULT_TERMS: &str = r#"{
    "spot": 17.31,
    "strike": 17.5,
    "days_to_expiry": 167,
    "rate": 4.919,
    "option_type": "Put"
}"#;

const DEFAULT_VOLATILITY: f64 = 0.592;
const LATTICE_STEPS: usize = 500;

/// Summary printed as JSON at the end of the run
#[derive(Debug, Serialize)]
struct Report {
    option_type: String,
    volatility: f64,
    bsm_price: f64,
    greeks: Greeks,
    european_tree: f64,
    american_tree: f64,
    early_exercise_premium: f64,
    implied_vol_percent: Option<f64>,
}

fn build_report(contract: &Contract, vol: f64, quote: &MarketQuote) -> PricingResult<Report> {
    let bsm_price = BlackScholes::price(contract, vol)?;
    let greeks = BlackScholes::greeks(contract, vol)?;

    let american = BinomialPricer::new(*contract, LATTICE_STEPS)?;
    let european = american.with_exercise(ExerciseStyle::European);

    let config = SolverConfig::new().with_bisection_fallback(true);
    let implied_vol_percent =
        match solve_iv_from_quote(contract, quote, PriceSource::MidPrice, &config) {
            Ok(result) => {
                info!(
                    "solved IV {:.4}% in {} iterations (spread {:?} bps, quality {:?})",
                    result.iv_percent(),
                    result.iterations,
                    result.spread_bps,
                    result.quality
                );
                Some(result.iv_percent())
            }
            Err(e) => {
                warn!("implied volatility unavailable: {}", e);
                None
            }
        };

    Ok(Report {
        option_type: contract.option_type().to_string(),
        volatility: vol,
        bsm_price,
        greeks,
        european_tree: european.price(vol)?,
        american_tree: american.price(vol)?,
        early_exercise_premium: american.early_exercise_premium(vol)?,
        implied_vol_percent,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let terms_json = match args.next() {
        Some(path) => fs::read_to_string(&path)?,
        None => DEFAULT_TERMS.to_string(),
    };
    let vol = match args.next() {
        Some(raw) => raw.parse::<f64>()?,
        None => DEFAULT_VOLATILITY,
    };

    let contract = ContractTerms::from_json(&terms_json)?.to_contract()?;
    info!(
        "pricing {} S={} K={} T={:.6}y r={:.5} q={:.5}",
        contract.option_type(),
        contract.spot(),
        contract.strike(),
        contract.time_to_expiry(),
        contract.rate(),
        contract.dividend_yield()
    );

    // quote a tight market around the model value
    let fair = BlackScholes::fair_value(&contract, vol)?;
    let quote = MarketQuote::new((fair - 0.02).max(0.0), fair + 0.02)?;

    let report = build_report(&contract, vol, &quote)?;
    info!(
        "BSM {:.2} | tree European {:.2} American {:.2}",
        report.bsm_price, report.european_tree, report.american_tree
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
