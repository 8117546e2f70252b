use optionpricer::prelude::*;

#[test]
fn test_negative_spot_is_invalid_contract() {
    let err = Contract::call(-1.0, 100.0, 30.0, 5.0).unwrap_err();
    assert!(matches!(err, PricingError::InvalidContract { field: "spot", .. }));
}

#[test]
fn test_expired_contract_is_invalid() {
    for days in [0.0, -3.0] {
        assert!(matches!(
            Contract::put(100.0, 100.0, days, 5.0),
            Err(PricingError::InvalidContract {
                field: "days_to_expiry",
                ..
            })
        ));
    }
}

#[test]
fn test_zero_volatility_is_domain_error() {
    let contract = Contract::call(100.0, 100.0, 30.0, 5.0).unwrap();
    assert!(matches!(
        BlackScholes::price(&contract, 0.0),
        Err(PricingError::DomainError { .. })
    ));
    assert!(matches!(
        BinomialPricer::new(contract, 100).unwrap().price(0.0),
        Err(PricingError::DomainError { .. })
    ));
}

#[test]
fn test_zero_steps_is_invalid_contract() {
    let contract = Contract::call(100.0, 100.0, 30.0, 5.0).unwrap();
    assert!(matches!(
        BinomialPricer::new(contract, 0),
        Err(PricingError::InvalidContract { field: "steps", .. })
    ));
}

#[test]
fn test_call_price_above_spot_is_rejected() {
    let contract = Contract::call(100.0, 100.0, 30.0, 5.0).unwrap();
    let err = solve_iv(&contract, 150.0, &SolverConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        PricingError::InvalidContract {
            field: "market_price",
            ..
        }
    ));
}

#[test]
fn test_unknown_option_type_token() {
    let terms = ContractTerms::from_json(
        r#"{"spot": 100, "strike": 100, "days_to_expiry": 30, "rate": 5, "option_type": "binary"}"#,
    )
    .unwrap();
    assert!(matches!(
        terms.to_contract(),
        Err(PricingError::InvalidContract {
            field: "option_type",
            ..
        })
    ));
}

#[test]
fn test_non_convergence_carries_diagnostics() {
    let contract = Contract::call(100.0, 100.0, 30.0, 5.0).unwrap();
    let config = SolverConfig::new().with_max_iterations(1).with_tolerance(1e-12);
    let price = BlackScholes::fair_value(&contract, 0.4).unwrap();

    match solve_iv(&contract, price, &config) {
        Err(PricingError::NonConvergence {
            iterations,
            last_estimate,
            residual,
        }) => {
            assert_eq!(iterations, 1);
            assert!(last_estimate.is_finite() && last_estimate > 0.0);
            assert!(residual.is_finite());
        }
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}
