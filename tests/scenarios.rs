//! End-to-end projection and valuation scenarios

use approx::assert_relative_eq;
use btc_calculator::forecast::{exponential_price, Anchor, MAX_THEORETICAL_PRICE};
use btc_calculator::market::FixedPrice;
use btc_calculator::{
    Amount, Calculator, Comparison, DashboardConfig, ForecastConfig, InvestmentQuery, PriceQuote,
    ProjectionEngine, ProjectionMethod, ProjectionRequest, Strategy, YearMonth,
};

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn request(current: YearMonth, target: YearMonth) -> ProjectionRequest {
    ProjectionRequest {
        current_price: 112_000.0,
        current_date: current,
        target_date: target,
    }
}

#[test]
fn short_horizon_both_strategies_reach_800k() {
    let engine = ProjectionEngine::new(ForecastConfig::default()).unwrap();
    let req = request(ym(2025, 1), ym(2030, 1));

    for strategy in [Strategy::Exponential, Strategy::AnchorInterpolation] {
        let result = engine.project_with(&req, strategy).unwrap();
        assert_relative_eq!(result.projected_price, 800_000.0, max_relative = 1e-6);
        assert!(!result.capped);
    }
}

#[test]
fn long_horizon_anchor_path_reaches_6m() {
    let config = ForecastConfig {
        anchors: vec![
            Anchor::new(2030, 800_000.0),
            Anchor::new(2040, 2_500_000.0),
            Anchor::new(2050, 6_000_000.0),
        ],
        ..Default::default()
    };
    let engine = ProjectionEngine::new(config).unwrap();
    let result = engine.project(&request(ym(2025, 1), ym(2050, 1))).unwrap();

    assert_relative_eq!(result.projected_price, 6_000_000.0, max_relative = 1e-9);
    assert_eq!(result.method, ProjectionMethod::AnchorInterpolation);
    assert!(!result.capped);
}

#[test]
fn exponential_defect_is_contained_by_engine() {
    let calibration = Anchor::new(2030, 800_000.0);
    let today = ym(2025, 10);

    let unbounded = exponential_price(112_000.0, today, ym(2050, 1), &calibration);
    assert!(unbounded > 5.0e9, "unbounded model should blow up, got {}", unbounded);

    let config = ForecastConfig {
        strategy: Strategy::Exponential,
        ..Default::default()
    };
    let engine = ProjectionEngine::new(config).unwrap();
    let contained = engine.project(&request(today, ym(2050, 1))).unwrap();
    assert!(contained.projected_price <= MAX_THEORETICAL_PRICE);
    assert!(unbounded / contained.projected_price > 1_000.0);
}

#[test]
fn ceiling_never_exceeded_for_any_strategy() {
    let config = ForecastConfig {
        max_year: 2100,
        extrapolation_years: 50,
        ..Default::default()
    };
    let engine = ProjectionEngine::new(config).unwrap();
    let today = ym(2025, 1);

    for strategy in [Strategy::Exponential, Strategy::AnchorInterpolation] {
        for offset in (0..=today.months_until(&ym(2100, 12))).step_by(7) {
            let result = engine
                .project_with(&request(today, today.add_months(offset)), strategy)
                .unwrap();
            assert!(result.projected_price <= MAX_THEORETICAL_PRICE);
        }
    }
}

#[test]
fn dashboard_flow_from_config() {
    let mut config = DashboardConfig::default();
    config.forecast.strategy = Strategy::Exponential;
    let calculator = Calculator::from_config(&config).unwrap();

    let today = ym(2025, 1);
    let quote = PriceQuote::resolve(&FixedPrice(112_000.0), config.market.fallback_price);
    let query = InvestmentQuery {
        amount: Amount::Usd(10_000.0),
        purchase_date: ym(2020, 3),
        comparison: Comparison::Future(ym(2030, 1)),
    };

    let summary = calculator.evaluate(&query, today, &quote).unwrap();
    assert_relative_eq!(summary.position.btc_amount, 1.5625);
    assert_relative_eq!(summary.valuation.current_value, 1_250_000.0, max_relative = 1e-6);
    assert_eq!(summary.projection.unwrap().method, ProjectionMethod::Exponential);

    let series = calculator
        .series(query.purchase_date, ym(2030, 1), summary.position.btc_amount, today, &quote)
        .unwrap();
    // 2020-03 ..= 2030-01 is 119 months, sampled monthly
    assert_eq!(series.step_months, 1);
    assert_eq!(series.points.len(), 119);
    assert!(series.has_projections);
    assert_relative_eq!(series.stats().max_price, 800_000.0, max_relative = 1e-6);
}
