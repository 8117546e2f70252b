use optionpricer::prelude::*;

const SPOTS: [f64; 4] = [60.0, 95.0, 100.0, 140.0];
const DAYS: [f64; 3] = [7.0, 90.0, 540.0];
const VOLS: [f64; 3] = [0.1, 0.35, 0.9];

fn grid() -> Vec<(Contract, Contract, f64)> {
    let mut cases = Vec::new();
    for spot in SPOTS {
        for days in DAYS {
            for vol in VOLS {
                let call = Contract::new(spot, 100.0, days, 4.0, 1.5, OptionType::Call).unwrap();
                let put = Contract::new(spot, 100.0, days, 4.0, 1.5, OptionType::Put).unwrap();
                cases.push((call, put, vol));
            }
        }
    }
    cases
}

#[test]
fn test_put_call_parity() {
    for (call, put, vol) in grid() {
        let diff = BlackScholes::fair_value(&call, vol).unwrap()
            - BlackScholes::fair_value(&put, vol).unwrap();
        let expected =
            call.spot() * call.dividend_discount() - call.strike() * call.rate_discount();
        assert!(
            (diff - expected).abs() < 1e-9,
            "parity broken for spot {} vol {}",
            call.spot(),
            vol
        );

        // rounded prices agree within the rounding resolution
        let rounded_diff =
            BlackScholes::price(&call, vol).unwrap() - BlackScholes::price(&put, vol).unwrap();
        assert!((rounded_diff - expected).abs() <= 0.01 + 1e-9);
    }
}

#[test]
fn test_delta_bounds() {
    for (call, put, vol) in grid() {
        let bound = call.dividend_discount();
        let call_delta = BlackScholes::raw_greeks(&call, vol).unwrap().delta;
        let put_delta = BlackScholes::raw_greeks(&put, vol).unwrap().delta;

        assert!((0.0..=bound).contains(&call_delta));
        assert!((-bound..=0.0).contains(&put_delta));
        assert!((call_delta - put_delta - bound).abs() < 1e-12);

        let rounded = BlackScholes::delta(&call, vol).unwrap();
        assert!((-1.0..=1.0).contains(&rounded));
    }
}

#[test]
fn test_gamma_and_vega_non_negative() {
    for (call, put, vol) in grid() {
        let call_greeks = BlackScholes::raw_greeks(&call, vol).unwrap();
        let put_greeks = BlackScholes::raw_greeks(&put, vol).unwrap();

        assert!(call_greeks.gamma >= 0.0);
        assert!(call_greeks.vega >= 0.0);
        assert!((call_greeks.gamma - put_greeks.gamma).abs() < 1e-12);
        assert!((call_greeks.vega - put_greeks.vega).abs() < 1e-12);
        assert!((call_greeks.vanna - put_greeks.vanna).abs() < 1e-12);
    }
}

#[test]
fn test_call_rho_positive_put_rho_negative() {
    for (call, put, vol) in grid() {
        assert!(BlackScholes::raw_greeks(&call, vol).unwrap().rho >= 0.0);
        assert!(BlackScholes::raw_greeks(&put, vol).unwrap().rho <= 0.0);
    }
}

#[test]
fn test_delta_matches_finite_difference() {
    let bump = 1e-4;
    let vol = 0.3;
    for option_type in [OptionType::Call, OptionType::Put] {
        let contract = Contract::new(100.0, 105.0, 120.0, 3.0, 1.0, option_type).unwrap();
        let up = Contract::new(100.0 + bump, 105.0, 120.0, 3.0, 1.0, option_type).unwrap();
        let down = Contract::new(100.0 - bump, 105.0, 120.0, 3.0, 1.0, option_type).unwrap();

        let numeric = (BlackScholes::fair_value(&up, vol).unwrap()
            - BlackScholes::fair_value(&down, vol).unwrap())
            / (2.0 * bump);
        let analytic = BlackScholes::raw_greeks(&contract, vol).unwrap().delta;
        assert!((numeric - analytic).abs() < 1e-6);
    }
}

#[test]
fn test_greek_map_names() {
    let contract = Contract::call(100.0, 100.0, 30.0, 5.0).unwrap();
    let map = BlackScholes::greeks(&contract, 0.25).unwrap().to_map();
    for name in ["delta", "gamma", "vega", "theta", "rho", "vanna"] {
        assert!(map.contains_key(name), "missing {name}");
    }
    let json = serde_json::to_string(&map).unwrap();
    assert!(json.starts_with("{\"delta\":"));
}
