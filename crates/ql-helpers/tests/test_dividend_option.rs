//! CRR dividend option scenario: a one-year put on a stock paying three cash
//! dividends, priced European and American on an 801-step lattice.

use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;
use ql_core::errors::Error;
use ql_core::Real;
use ql_helpers::{DividendOptionHelper, DividendOptionHelperBuilder};
use ql_instruments::{ExerciseType, OptionType};
use ql_time::date::ymd;
use ql_time::{Actual365Fixed, Date, Target};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn date(y: i32, m: u32, d: u32) -> Date {
    ymd(y, m, d).unwrap()
}

fn scenario() -> DividendOptionHelperBuilder {
    DividendOptionHelper::builder()
        .option_type(OptionType::Put)
        .spot(36.0)
        .strike(40.0)
        .risk_free_rate(0.06)
        .dividend_yield(0.0)
        .volatility(0.20)
        .valuation_date(date(1998, 5, 15))
        .settlement_date(date(1998, 5, 17))
        .maturity_date(date(1999, 5, 17))
        .dividends(
            vec![date(1998, 8, 30), date(1998, 11, 30), date(1999, 3, 2)],
            vec![2.06, 2.06, 2.06],
        )
        .calendar(Arc::new(Target))
        .day_counter(Arc::new(Actual365Fixed))
        .time_steps(801)
}

struct Expected {
    npv: Real,
    delta: Real,
    gamma: Real,
    vega: Real,
    rho: Real,
    dividend_rho: Real,
    theta: Real,
    strike_sensitivity: Real,
}

fn check(helper: &DividendOptionHelper, e: &Expected) {
    let r = helper.results().unwrap();
    assert_relative_eq!(r.value, e.npv, max_relative = 1e-6);
    assert_relative_eq!(r.greeks.delta, e.delta, max_relative = 1e-5);
    assert_relative_eq!(r.greeks.gamma, e.gamma, max_relative = 1e-5);
    assert_relative_eq!(r.greeks.vega, e.vega, max_relative = 1e-5);
    assert_relative_eq!(r.greeks.rho, e.rho, max_relative = 1e-5);
    assert_relative_eq!(r.greeks.dividend_rho, e.dividend_rho, max_relative = 1e-5);
    assert_relative_eq!(r.greeks.theta, e.theta, max_relative = 1e-5);
    assert_relative_eq!(
        r.more_greeks.strike_sensitivity,
        e.strike_sensitivity,
        max_relative = 1e-5
    );
    assert_relative_eq!(r.more_greeks.theta_per_day, e.theta / 365.0, max_relative = 1e-5);
    assert_relative_eq!(
        r.more_greeks.elasticity,
        e.delta * 36.0 / e.npv,
        max_relative = 1e-5
    );
}

#[test]
fn test_european_put_with_cash_dividends() {
    init_tracing();
    let helper = scenario().crr_european().unwrap();
    assert_eq!(helper.exercise_type(), ExerciseType::European);
    check(
        &helper,
        &Expected {
            npv: 8.073443281721246,
            delta: -0.8492285027182394,
            gamma: 0.03718606217499673,
            vega: 7.24637105848025,
            rho: -36.47572299912305,
            dividend_rho: 25.617889354503376,
            theta: 1.5955522567545088,
            strike_sensitivity: 0.8394456081662027,
        },
    );
}

#[test]
fn test_american_put_with_cash_dividends() {
    init_tracing();
    let helper = scenario().crr_american().unwrap();
    assert_eq!(helper.exercise_type(), ExerciseType::American);
    check(
        &helper,
        &Expected {
            npv: 8.447884161056908,
            delta: -0.8723068079071356,
            gamma: 0.03545946223615782,
            vega: 6.306158892162017,
            rho: -30.942325945666482,
            dividend_rho: 21.343797191910596,
            theta: 2.163622040508315,
            strike_sensitivity: 0.8659414288831591,
        },
    );
}

#[test]
fn test_individual_greeks_match_bundle() {
    let helper = scenario().time_steps(200).crr_american().unwrap();
    let g = helper.greeks().unwrap();
    assert_eq!(helper.delta().unwrap(), g.delta);
    assert_eq!(helper.gamma().unwrap(), g.gamma);
    assert_eq!(helper.vega().unwrap(), g.vega);
    assert_eq!(helper.rho().unwrap(), g.rho);
    assert_eq!(helper.dividend_rho().unwrap(), g.dividend_rho);
    assert_eq!(helper.theta().unwrap(), g.theta);
}

#[test]
fn test_american_not_below_european() {
    let eu = scenario().crr_european().unwrap().npv().unwrap();
    let am = scenario().crr_american().unwrap().npv().unwrap();
    assert!(am >= eu, "{am} < {eu}");
}

#[test]
fn test_repeated_pricing_is_bitwise_identical() {
    let a = scenario().crr_american().unwrap().results().unwrap();
    let b = scenario().crr_american().unwrap().results().unwrap();
    assert_eq!(a.value.to_bits(), b.value.to_bits());
    assert_eq!(a.greeks, b.greeks);
    assert_eq!(a.more_greeks, b.more_greeks);
}

#[test]
fn test_dividends_exceeding_spot_rejected() {
    let err = scenario()
        .dividends(
            vec![date(1998, 8, 30), date(1998, 11, 30), date(1999, 3, 2)],
            vec![15.0, 15.0, 15.0],
        )
        .crr_european()
        .unwrap_err();
    assert!(matches!(err, Error::InconsistentDividendSchedule { .. }), "{err}");
}

#[test]
fn test_settlement_after_maturity_rejected() {
    let err = scenario()
        .settlement_date(date(1999, 6, 1))
        .crr_american()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidContract {
            parameter: "settlement_date",
            ..
        }
    ));
}

#[test]
fn test_maturity_not_after_valuation_rejected() {
    let err = scenario()
        .settlement_date(date(1998, 5, 15))
        .maturity_date(date(1998, 5, 15))
        .dividends(vec![], vec![])
        .crr_european()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidContract {
            parameter: "maturity_date",
            ..
        }
    ));
}

#[test]
fn test_dividend_outside_window_rejected() {
    for ex_date in [date(1998, 5, 15), date(1998, 5, 1), date(1999, 5, 17), date(1999, 6, 1)] {
        let err = scenario()
            .dividends(vec![ex_date], vec![1.0])
            .crr_european()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDividend { .. }), "{ex_date}: {err}");
    }
}

#[test]
fn test_negative_dividend_rejected() {
    let err = scenario()
        .dividends(vec![date(1998, 8, 30)], vec![-1.0])
        .crr_european()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDividend { .. }), "{err}");
}

#[test]
fn test_mismatched_dividend_lists_rejected() {
    let err = scenario()
        .dividends(vec![date(1998, 8, 30)], vec![1.0, 2.0])
        .crr_european()
        .unwrap_err();
    assert!(matches!(err, Error::Precondition(_)), "{err}");
}

#[test]
fn test_non_positive_inputs_rejected() {
    let cases: [(DividendOptionHelperBuilder, &str); 4] = [
        (scenario().spot(0.0), "spot"),
        (scenario().strike(0.0), "strike"),
        (scenario().volatility(0.0), "volatility"),
        (scenario().time_steps(0), "time_steps"),
    ];
    for (builder, name) in cases {
        match builder.crr_american() {
            Err(Error::InvalidContract { parameter, .. }) => assert_eq!(parameter, name),
            other => panic!("{name}: unexpected {other:?}"),
        }
    }
}

#[test]
fn test_zero_dividend_is_harmless() {
    let plain = scenario().dividends(vec![], vec![]).time_steps(200);
    let zero = scenario()
        .dividends(vec![date(1998, 8, 30)], vec![0.0])
        .time_steps(200);
    let a = plain.crr_american().unwrap().npv().unwrap();
    let b = zero.crr_american().unwrap().npv().unwrap();
    assert_relative_eq!(a, b, max_relative = 1e-12);
}

#[test]
fn test_spot_greeks_near_escrow_boundary() {
    // present value of the dividend is 99.5 % of spot
    let amount = 0.995 * 36.0 * (0.06f64 * 107.0 / 365.0).exp();
    let helper = scenario()
        .dividends(vec![date(1998, 8, 30)], vec![amount])
        .time_steps(200)
        .crr_european()
        .unwrap();
    assert!(helper.npv().unwrap() > 0.0);
    let delta = helper.delta().unwrap();
    assert!((-1.0 - 1e-9..=1e-9).contains(&delta), "{delta}");
    assert!(helper.gamma().unwrap().is_finite());
    assert!(helper.results().is_ok());
}

#[test]
fn test_theta_of_option_expiring_next_day() {
    let helper = scenario()
        .settlement_date(date(1998, 5, 15))
        .maturity_date(date(1998, 5, 16))
        .dividends(vec![], vec![])
        .time_steps(100)
        .crr_american()
        .unwrap();
    assert!(helper.theta().unwrap().is_finite());
    let r = helper.results().unwrap();
    assert_eq!(r.more_greeks.theta_per_day, r.greeks.theta / 365.0);
}

#[test]
fn test_implied_volatility_unsupported() {
    let helper = scenario().time_steps(50).crr_european().unwrap();
    assert!(matches!(
        helper.implied_volatility(8.0),
        Err(Error::UnsupportedOperation(_))
    ));
}

fn coarse(option_type: OptionType, spot: Real, strike: Real, vol: Real) -> DividendOptionHelperBuilder {
    scenario()
        .option_type(option_type)
        .spot(spot)
        .strike(strike)
        .volatility(vol)
        .time_steps(200)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_put_delta_bounded(spot in 30.0f64..60.0, strike in 25.0f64..60.0, vol in 0.1f64..0.5) {
        for helper in [
            coarse(OptionType::Put, spot, strike, vol).crr_european().unwrap(),
            coarse(OptionType::Put, spot, strike, vol).crr_american().unwrap(),
        ] {
            let delta = helper.delta().unwrap();
            prop_assert!((-1.0 - 1e-9..=1e-9).contains(&delta), "{}", delta);
        }
    }

    #[test]
    fn prop_call_delta_bounded(spot in 30.0f64..60.0, strike in 25.0f64..60.0, vol in 0.1f64..0.5) {
        let helper = coarse(OptionType::Call, spot, strike, vol).crr_american().unwrap();
        let delta = helper.delta().unwrap();
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&delta), "{}", delta);
    }

    #[test]
    fn prop_american_put_bounds(spot in 30.0f64..60.0, strike in 25.0f64..60.0, vol in 0.1f64..0.5) {
        let v = coarse(OptionType::Put, spot, strike, vol).crr_american().unwrap().npv().unwrap();
        prop_assert!(v >= (strike - spot).max(0.0) - 1e-9, "{} below intrinsic", v);
        prop_assert!(v <= strike + 1e-9, "{} above strike", v);
    }

    #[test]
    fn prop_price_increases_with_volatility(spot in 30.0f64..60.0, strike in 25.0f64..60.0, vol in 0.1f64..0.45) {
        for option_type in [OptionType::Put, OptionType::Call] {
            let low = coarse(option_type, spot, strike, vol).crr_american().unwrap().npv().unwrap();
            let high = coarse(option_type, spot, strike, vol + 0.05).crr_american().unwrap().npv().unwrap();
            prop_assert!(high >= low - 1e-9, "{}: {} < {}", option_type, high, low);
        }
    }
}
