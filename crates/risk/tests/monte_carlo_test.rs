use analytics::{ImpactInputs, UnitEconomics};
use configuration::Simulation;
use core_types::{ProductTier, RiskBand};
use risk::MonteCarloSimulator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn single_plan() -> UnitEconomics {
    let products = vec![ProductTier {
        name: "Basic Cover".to_string(),
        year1_price: dec!(100),
        year2_price: dec!(200),
        mix_pct: dec!(100),
        retention_pct: Some(dec!(50)),
    }];
    UnitEconomics::from_products(&products, dec!(0.85)).unwrap()
}

fn inputs(variant_rate: Decimal) -> ImpactInputs {
    ImpactInputs {
        traffic: dec!(10000),
        cost: dec!(5000),
        control_rate: dec!(0.02),
        variant_rate,
        blended_ltv: dec!(200),
    }
}

fn simulator(volatility: Decimal, seed: u64) -> MonteCarloSimulator {
    MonteCarloSimulator::new(Simulation {
        runs: 1000,
        volatility,
        seed: Some(seed),
    })
    .unwrap()
}

#[test]
fn without_volatility_every_future_is_the_point_estimate() {
    let report = simulator(Decimal::ZERO, 7)
        .run(&inputs(dec!(0.023)), &single_plan())
        .unwrap();

    // 10000 * 0.003 * 200 - 5000
    assert!((report.best_case - dec!(1000)).abs() < dec!(0.01));
    assert!((report.worst_case - dec!(1000)).abs() < dec!(0.01));
    assert!((report.mean_profit - dec!(1000)).abs() < dec!(0.01));
    assert_eq!(report.win_rate_pct, dec!(100));
    assert_eq!(report.risk_band, RiskBand::Safe);
    assert_eq!(report.runs, 1000);
}

#[test]
fn a_losing_strategy_is_high_risk() {
    let report = simulator(Decimal::ZERO, 7)
        .run(&inputs(dec!(0.02)), &single_plan())
        .unwrap();

    assert_eq!(report.win_rate_pct, Decimal::ZERO);
    assert_eq!(report.risk_band, RiskBand::High);
}

#[test]
fn the_same_seed_replays_the_same_futures() {
    let a = simulator(dec!(0.10), 42).run(&inputs(dec!(0.023)), &single_plan()).unwrap();
    let b = simulator(dec!(0.10), 42).run(&inputs(dec!(0.023)), &single_plan()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn volatility_spreads_the_outcomes() {
    let report = simulator(dec!(0.10), 42)
        .run(&inputs(dec!(0.023)), &single_plan())
        .unwrap();

    assert!(report.worst_case < report.best_case);
    assert!(report.win_rate_pct >= Decimal::ZERO && report.win_rate_pct <= dec!(100));
    assert!(report.worst_case < dec!(1000) && report.best_case > dec!(1000));
}

#[test]
fn negative_volatility_is_rejected_up_front() {
    let result = MonteCarloSimulator::new(Simulation {
        runs: 10,
        volatility: dec!(-0.1),
        seed: None,
    });
    assert!(result.is_err());
}
