use optionpricer::prelude::*;

const BAND: f64 = 0.005;

#[test]
fn test_solver_inverts_analytic_pricer() {
    let config = SolverConfig::default();
    let mut checked = 0;

    for spot in [80.0, 100.0, 120.0] {
        for days in [30.0, 180.0, 365.0] {
            for vol in [0.15, 0.3, 0.6] {
                for option_type in [OptionType::Call, OptionType::Put] {
                    let contract =
                        Contract::new(spot, 100.0, days, 3.0, 1.0, option_type).unwrap();
                    // price moves less than the tolerance across the whole band
                    let vega = BlackScholes::vega_per_unit(&contract, vol).unwrap();
                    if vega * BAND < config.tolerance {
                        continue;
                    }
                    let price = BlackScholes::fair_value(&contract, vol).unwrap();

                    let result = solve_iv(&contract, price, &config).unwrap();
                    assert!(
                        (result.iv - vol).abs() < BAND,
                        "{option_type} spot {spot} days {days}: expected {vol}, got {}",
                        result.iv
                    );
                    checked += 1;
                }
            }
        }
    }
    assert!(checked >= 50);
}

#[test]
fn test_solver_inverts_out_of_the_money_quotes() {
    let config = SolverConfig::default();
    let cases = [
        (OptionType::Call, 110.0, 30.0, 0.25),
        (OptionType::Call, 115.0, 60.0, 0.30),
        (OptionType::Call, 120.0, 91.25, 0.25),
        (OptionType::Call, 130.0, 180.0, 0.20),
        (OptionType::Put, 90.0, 30.0, 0.25),
        (OptionType::Put, 85.0, 91.0, 0.30),
        (OptionType::Put, 80.0, 180.0, 0.35),
    ];

    for (option_type, strike, days, vol) in cases {
        let contract = Contract::new(100.0, strike, days, 5.0, 0.0, option_type).unwrap();
        assert!(contract.is_otm());
        let price = BlackScholes::fair_value(&contract, vol).unwrap();

        let result = solve_iv(&contract, price, &config).unwrap();
        assert!(
            (result.iv - vol).abs() < 1e-4,
            "{option_type} strike {strike} days {days}: expected {vol}, got {}",
            result.iv
        );
        assert!(result.iterations <= config.max_iterations);
    }
}

#[test]
fn test_solver_inverts_binomial_pricer() {
    let contract = Contract::put(100.0, 105.0, 120.0, 5.0).unwrap();
    let pricer = BinomialPricer::new(contract, 200).unwrap();
    let price = pricer.fair_value(0.3).unwrap();

    let config = SolverConfig::new()
        .with_tolerance(1e-4)
        .with_pricer(InnerPricer::Binomial {
            steps: 200,
            exercise: ExerciseStyle::American,
        });
    let result = solve_iv(&contract, price, &config).unwrap();
    assert!((result.iv - 0.3).abs() < 0.005);
}

#[test]
fn test_bisection_agrees_with_newton() {
    let contract = Contract::call(100.0, 95.0, 60.0, 2.0).unwrap();
    let price = BlackScholes::fair_value(&contract, 0.42).unwrap();
    let config = SolverConfig::default();

    let newton = solve_iv(&contract, price, &config).unwrap();
    let bisection = solve_iv_bisection(&contract, price, &config).unwrap();
    assert!((newton.iv - bisection.iv).abs() < 1e-4);
    assert!(bisection.iterations > newton.iterations);
}

#[test]
fn test_quote_round_trip() {
    let contract = Contract::put(100.0, 100.0, 45.0, 4.0).unwrap();
    let fair = BlackScholes::fair_value(&contract, 0.22).unwrap();
    let quote = MarketQuote::new(fair - 0.05, fair + 0.05).unwrap();

    let result = solve_iv_from_quote(
        &contract,
        &quote,
        PriceSource::MidPrice,
        &SolverConfig::default(),
    )
    .unwrap();
    assert!((result.iv - 0.22).abs() < 1e-4);
    assert_eq!(result.quality, Some(IvQuality::Medium));
}

#[test]
fn test_realized_vol_feeds_pricer() {
    let closes = [100.0, 101.2, 100.4, 102.0, 101.1, 103.3, 102.7, 104.0];
    let vol = realized_volatility(&closes, 252.0).unwrap();
    assert!(vol > 0.0 && vol < 1.0);
    assert_eq!(log_returns(&closes).unwrap().len(), closes.len() - 1);

    let contract = Contract::call(104.0, 105.0, 30.0, 4.0).unwrap();
    assert!(BlackScholes::price(&contract, vol).unwrap() > 0.0);
}
