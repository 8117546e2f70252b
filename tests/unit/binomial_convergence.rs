use optionpricer::prelude::*;

#[test]
fn test_european_lattice_converges_to_analytic() {
    let cases = [
        (17.31, 17.5, 167.0, 4.919, 0.0, 0.592),
        (100.0, 100.0, 365.0, 5.0, 0.0, 0.2),
        (100.0, 90.0, 90.0, 3.0, 2.0, 0.35),
        (50.0, 60.0, 250.0, 1.0, 0.0, 0.45),
    ];

    for (spot, strike, days, rate, dividend, vol) in cases {
        for option_type in [OptionType::Call, OptionType::Put] {
            let contract = Contract::new(spot, strike, days, rate, dividend, option_type).unwrap();
            let analytic = BlackScholes::fair_value(&contract, vol).unwrap();
            let tree = BinomialPricer::european(contract, 5000)
                .unwrap()
                .fair_value(vol)
                .unwrap();
            assert!(
                (tree - analytic).abs() < 0.05,
                "{option_type} spot {spot} strike {strike}: tree {tree} analytic {analytic}"
            );
        }
    }
}

#[test]
fn test_error_shrinks_with_steps() {
    let contract = Contract::call(100.0, 100.0, 365.0, 5.0).unwrap();
    let analytic = BlackScholes::fair_value(&contract, 0.2).unwrap();

    let coarse = BinomialPricer::european(contract, 10).unwrap().fair_value(0.2).unwrap();
    let fine = BinomialPricer::european(contract, 1000).unwrap().fair_value(0.2).unwrap();
    assert!((fine - analytic).abs() < (coarse - analytic).abs());
    assert!((fine - analytic).abs() < 0.01);
}

#[test]
fn test_american_dominates_european() {
    for strike in [80.0, 100.0, 120.0] {
        for option_type in [OptionType::Call, OptionType::Put] {
            let contract = Contract::new(100.0, strike, 180.0, 5.0, 2.0, option_type).unwrap();
            let american = BinomialPricer::new(contract, 300).unwrap().fair_value(0.3).unwrap();
            let european = BinomialPricer::european(contract, 300)
                .unwrap()
                .fair_value(0.3)
                .unwrap();
            assert!(american >= european - 1e-12);
            assert!(american >= contract.intrinsic_value() - 1e-12);
        }
    }
}
