use optionpricer::prelude::*;

fn reference_put() -> Contract {
    Contract::put(17.31, 17.5, 167.0, 4.919).unwrap()
}

#[test]
fn test_bsm_put_matches_textbook_value() {
    // closed form evaluated independently: 2.632498...
    let price = BlackScholes::price(&reference_put(), 0.592).unwrap();
    assert_eq!(price, 2.63);
}

#[test]
fn test_bsm_and_crr_agree() {
    let contract = reference_put();
    let bsm = BlackScholes::price(&contract, 0.592).unwrap();

    let european = BinomialPricer::european(contract, 5000)
        .unwrap()
        .price(0.592)
        .unwrap();
    assert!((european - bsm).abs() < 0.05);
    assert_eq!(european, 2.63);

    let american = BinomialPricer::new(contract, 5000)
        .unwrap()
        .price(0.592)
        .unwrap();
    assert!((american - bsm).abs() < 0.05);
    assert!(american >= european);
}

#[test]
fn test_contract_terms_drive_the_same_price() {
    let terms = ContractTerms {
        spot: 17.31,
        strike: 17.5,
        days_to_expiry: 167.0,
        rate: 4.919,
        dividend_yield: 0.0,
        option_type: "Put".to_string(),
        day_count: 365.0,
    };
    let contract = terms.to_contract().unwrap();
    assert_eq!(contract, reference_put());
    assert_eq!(BlackScholes::price(&contract, 0.592).unwrap(), 2.63);
}

#[test]
fn test_implied_vol_recovery() {
    let contract = Contract::put(18.05, 15.0, 159.0, 0.05198).unwrap();
    let config = SolverConfig::default();

    let result = solve_iv(&contract, 1.25, &config).unwrap();
    assert!(result.iterations <= config.max_iterations);

    let pct = result.iv_percent();
    assert!(pct.is_finite() && pct > 0.0);
    assert!((pct - 57.599).abs() < 0.01);

    let repriced = BlackScholes::fair_value(&contract, result.iv).unwrap();
    assert!((repriced - 1.25).abs() < config.tolerance);

    assert_eq!(implied_vol_percent(&contract, 1.25, &config).unwrap(), pct);
}
