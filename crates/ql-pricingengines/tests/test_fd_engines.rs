//! Integration tests for the control-variate finite-difference engine.

use approx::assert_relative_eq;
use proptest::prelude::*;
use ql_core::{Error, Real};
use ql_instruments::{
    DividendVanillaOption, Exercise, ForwardPayoff, OptionType, PlainVanillaPayoff, Position,
    PricingEngine, VanillaOption,
};
use ql_methods::{FdmScheme, FdmSettings};
use ql_pricingengines::{AnalyticEuropeanEngine, FdStepConditionEngine};
use ql_processes::GeneralizedBlackScholesProcess;
use ql_termstructures::{
    BlackConstantVol, BlackVarianceCurve, FlatForward, InterpolatedZeroCurve, Linear,
};
use std::sync::Arc;

fn process(spot: Real, r: Real, q: Real, vol: Real) -> Arc<GeneralizedBlackScholesProcess> {
    Arc::new(GeneralizedBlackScholesProcess::new(
        spot,
        Arc::new(FlatForward::new(r)),
        Arc::new(FlatForward::new(q)),
        Arc::new(BlackConstantVol::new(vol)),
    ))
}

fn settings() -> FdmSettings {
    FdmSettings::default().with_time_steps(200).with_grid_points(201)
}

fn fd_engine() -> FdStepConditionEngine {
    FdStepConditionEngine::new(process(100.0, 0.05, 0.0, 0.2), settings())
}

fn call_payoff() -> Arc<PlainVanillaPayoff> {
    Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0))
}

#[test]
fn european_call_matches_black() {
    let option = VanillaOption::european(OptionType::Call, 100.0, 1.0);
    let results = option.price(&fd_engine()).unwrap();
    assert!((results.value - 10.450_583_572_185_565).abs() < 1e-3, "{}", results.value);
    assert_eq!(results.price_curve.size(), 201);
}

#[test]
fn european_option_reproduces_its_analytic_comparable() {
    let analytic = AnalyticEuropeanEngine::new(process(100.0, 0.05, 0.0, 0.2));
    for option_type in [OptionType::Call, OptionType::Put] {
        let option = VanillaOption::european(option_type, 95.0, 0.5);
        let fd = option.price(&fd_engine()).unwrap();
        let exact = option.price(&analytic).unwrap();
        assert_eq!(fd.value, exact.npv);
        assert_eq!(fd.delta, exact.result("delta").unwrap());
        assert_eq!(fd.gamma, exact.result("gamma").unwrap());
    }
}

#[test]
fn cash_dividend_lowers_the_call_value() {
    let plain = VanillaOption::european(OptionType::Call, 100.0, 1.0)
        .price(&fd_engine())
        .unwrap();
    let with_dividend = DividendVanillaOption::with_cash_dividends(
        call_payoff(),
        Exercise::european(1.0),
        &[0.5],
        &[5.0],
    )
    .unwrap()
    .price(&fd_engine())
    .unwrap();
    assert!(with_dividend.value < plain.value);
    assert!(with_dividend.value > plain.value - 5.0);
    assert!(with_dividend.delta < plain.delta);
}

#[test]
fn zero_dividend_changes_nothing() {
    let plain = VanillaOption::european(OptionType::Call, 100.0, 1.0)
        .price(&fd_engine())
        .unwrap();
    let zero = DividendVanillaOption::with_cash_dividends(
        call_payoff(),
        Exercise::european(1.0),
        &[0.5],
        &[0.0],
    )
    .unwrap()
    .price(&fd_engine())
    .unwrap();
    assert_relative_eq!(zero.value, plain.value, max_relative = 1e-12);
}

#[test]
fn mismatched_dividend_sequences_are_rejected() {
    let err = DividendVanillaOption::with_cash_dividends(
        call_payoff(),
        Exercise::european(1.0),
        &[0.25, 0.5, 0.75],
        &[1.0, 2.0],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::SizeMismatch {
            what: "dividend dates and amounts".into(),
            left: 3,
            right: 2,
        }
    );
}

#[test]
fn non_striked_payoff_is_a_configuration_error() {
    let option = VanillaOption::new(
        Arc::new(ForwardPayoff::new(Position::Long, 100.0)),
        Exercise::american(0.0, 1.0).unwrap(),
    );
    assert!(matches!(option.price(&fd_engine()), Err(Error::Configuration(_))));
}

#[test]
fn american_put_reference_value() {
    let american = VanillaOption::american(OptionType::Put, 100.0, 1.0)
        .unwrap()
        .price(&fd_engine())
        .unwrap();
    let european = VanillaOption::european(OptionType::Put, 100.0, 1.0)
        .price(&fd_engine())
        .unwrap();
    assert!(american.value > european.value);
    assert!((american.value - 6.0904).abs() < 2e-2, "{}", american.value);
    assert!(american.delta < 0.0 && american.gamma > 0.0);
}

#[test]
fn american_call_without_dividends_is_european() {
    let american = VanillaOption::american(OptionType::Call, 100.0, 1.0)
        .unwrap()
        .price(&fd_engine())
        .unwrap();
    let european = VanillaOption::european(OptionType::Call, 100.0, 1.0)
        .price(&fd_engine())
        .unwrap();
    assert!((american.value - european.value).abs() < 2e-3);
}

#[test]
fn bermudan_lies_between_european_and_american() {
    let price = |exercise: Exercise| {
        VanillaOption::new(
            Arc::new(PlainVanillaPayoff::new(OptionType::Put, 110.0)),
            exercise,
        )
        .price(&fd_engine())
        .unwrap()
        .value
    };
    let european = price(Exercise::european(1.0));
    let bermudan = price(Exercise::bermudan(vec![0.25, 0.5, 0.75, 1.0]).unwrap());
    let american = price(Exercise::american(0.0, 1.0).unwrap());
    assert!(european < bermudan, "{european} vs {bermudan}");
    assert!(bermudan < american, "{bermudan} vs {american}");
}

#[test]
fn shout_right_adds_value_to_a_put() {
    let option = VanillaOption::european(OptionType::Put, 100.0, 1.0);
    let european = option.price(&fd_engine()).unwrap();
    let shout = option
        .price(&FdStepConditionEngine::shout(process(100.0, 0.05, 0.0, 0.2), settings()))
        .unwrap();
    assert!(shout.value > european.value, "{} vs {}", shout.value, european.value);
    assert!(shout.value < 100.0);
}

#[test]
fn time_dependent_operator_agrees_on_a_flat_market() {
    let option = VanillaOption::american(OptionType::Put, 100.0, 1.0).unwrap();
    let constant = option.price(&fd_engine()).unwrap();
    let term = FdStepConditionEngine::new(
        process(100.0, 0.05, 0.0, 0.2),
        settings().with_time_dependent(true),
    );
    let varying = option.price(&term).unwrap();
    assert!((constant.value - varying.value).abs() < 1e-4);
}

#[test]
fn term_structure_of_volatility_is_used() {
    let curve = BlackVarianceCurve::new(&[0.5, 1.0], &[0.15, 0.25]).unwrap();
    let process = Arc::new(GeneralizedBlackScholesProcess::new(
        100.0,
        Arc::new(FlatForward::new(0.03)),
        Arc::new(FlatForward::new(0.01)),
        Arc::new(curve),
    ));
    let option = VanillaOption::american(OptionType::Put, 100.0, 1.0).unwrap();
    for scheme in [FdmScheme::Implicit, FdmScheme::CrankNicolson] {
        let engine = FdStepConditionEngine::new(
            Arc::clone(&process),
            settings().with_scheme(scheme).with_time_dependent(true),
        );
        let results = option.price(&engine).unwrap();
        assert!(results.value > 0.0 && results.value.is_finite());
    }
}

#[test]
fn upward_sloping_rates_feed_the_time_dependent_operator() {
    let rates = InterpolatedZeroCurve::new(&[0.0, 0.5, 1.0], &[0.02, 0.04, 0.06], &Linear).unwrap();
    let process = Arc::new(GeneralizedBlackScholesProcess::new(
        100.0,
        Arc::new(rates),
        Arc::new(FlatForward::new(0.0)),
        Arc::new(BlackConstantVol::new(0.2)),
    ));
    let engine = FdStepConditionEngine::new(
        Arc::clone(&process),
        settings().with_time_dependent(true),
    );
    let european = VanillaOption::european(OptionType::Put, 100.0, 1.0);
    let exact = european.price(&AnalyticEuropeanEngine::new(process)).unwrap();
    assert_relative_eq!(european.price(&engine).unwrap().value, exact.npv, max_relative = 1e-12);

    let american = VanillaOption::american(OptionType::Put, 100.0, 1.0).unwrap();
    assert!(american.price(&engine).unwrap().value > exact.npv);
}

#[test]
fn concurrent_pricing_gives_identical_results() {
    let engine = fd_engine();
    let option = VanillaOption::american(OptionType::Put, 100.0, 1.0).unwrap();
    let reference = option.price(&engine).unwrap().value;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.calculate(&option.arguments()).unwrap().value))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), reference);
        }
    });
}

#[test]
fn zero_steps_are_rejected() {
    let engine = FdStepConditionEngine::new(
        process(100.0, 0.05, 0.0, 0.2),
        FdmSettings::default().with_time_steps(0),
    );
    let option = VanillaOption::european(OptionType::Call, 100.0, 1.0);
    assert!(matches!(option.price(&engine), Err(Error::Precondition(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn early_exercise_is_never_worth_less(strike in 80.0..120.0f64) {
        let engine = FdStepConditionEngine::new(
            process(100.0, 0.05, 0.0, 0.2),
            FdmSettings::default().with_time_steps(50).with_grid_points(51),
        );
        let american = VanillaOption::american(OptionType::Put, strike, 1.0)
            .unwrap()
            .price(&engine)
            .unwrap();
        let european = VanillaOption::european(OptionType::Put, strike, 1.0)
            .price(&engine)
            .unwrap();
        prop_assert!(american.value >= european.value - 1e-10);
    }
}
