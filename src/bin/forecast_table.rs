//! Compare the unbounded exponential model with the anchored engine
//!
//! Prints projected prices by year for several current prices.
//! Supports JSON output via --json flag
//! Accepts config via environment variables:
//!   FORECAST_TODAY (YYYY-MM), FORECAST_PRICES (comma separated), plus the BTC_* overrides

use std::env;

use anyhow::{Context, Result};
use btc_calculator::{
    forecast::{exponential_price, ProjectionRequest},
    DashboardConfig, ProjectionEngine, Strategy, YearMonth,
};
use rayon::prelude::*;
use serde::Serialize;

/// Total BTC supply used for market cap figures
const BTC_SUPPLY: f64 = 21_000_000.0;
const GLOBAL_WEALTH_LOW: f64 = 100e12;
const GLOBAL_WEALTH_HIGH: f64 = 300e12;

const DEFAULT_PRICES: [f64; 3] = [60_000.0, 100_000.0, 112_000.0];
const YEARS: [i32; 9] = [2026, 2027, 2028, 2029, 2030, 2035, 2040, 2045, 2050];

#[derive(Serialize)]
struct YearRow {
    year: i32,
    unbounded_exponential: f64,
    exponential: f64,
    anchored: f64,
    anchored_multiple: f64,
    capped: bool,
}

#[derive(Serialize)]
struct ForecastTable {
    current_price: f64,
    growth_rate_pct: f64,
    rows: Vec<YearRow>,
}

fn main() -> Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");

    let mut config = DashboardConfig::default();
    config.apply_env()?;
    let engine = ProjectionEngine::new(config.forecast.clone())?;

    let today: YearMonth = match env::var("FORECAST_TODAY") {
        Ok(v) => v.parse().with_context(|| format!("FORECAST_TODAY={}", v))?,
        Err(_) => YearMonth::current(),
    };
    let prices: Vec<f64> = match env::var("FORECAST_PRICES") {
        Ok(v) => v
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .with_context(|| format!("FORECAST_PRICES={}", v))?,
        Err(_) => DEFAULT_PRICES.to_vec(),
    };

    let years: Vec<i32> = YEARS
        .iter()
        .copied()
        .filter(|&y| YearMonth::january(y) >= today && y <= config.forecast.max_year)
        .collect();

    let tables = prices
        .iter()
        .map(|&current_price| build_table(&engine, today, current_price, &years))
        .collect::<Result<Vec<_>>>()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    for table in &tables {
        print_table(table);
    }
    Ok(())
}

fn build_table(engine: &ProjectionEngine, today: YearMonth, current_price: f64, years: &[i32]) -> Result<ForecastTable> {
    let calibration = engine.config().calibration;

    let rows = years
        .par_iter()
        .map(|&year| -> Result<YearRow> {
            let request = ProjectionRequest {
                current_price,
                current_date: today,
                target_date: YearMonth::january(year),
            };
            let exponential = engine.project_with(&request, Strategy::Exponential)?;
            let anchored = engine.project_with(&request, Strategy::AnchorInterpolation)?;

            Ok(YearRow {
                year,
                unbounded_exponential: exponential_price(current_price, today, request.target_date, &calibration),
                exponential: exponential.projected_price,
                anchored: anchored.projected_price,
                anchored_multiple: anchored.projected_price / current_price,
                capped: anchored.capped,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ForecastTable {
        current_price,
        growth_rate_pct: engine.model_summary(current_price, today).growth_rate_pct,
        rows,
    })
}

fn print_table(table: &ForecastTable) {
    println!("\n{}", "=".repeat(88));
    println!("CURRENT BTC PRICE: ${:.0}", table.current_price);
    println!("Growth rate to calibration anchor: {:.2}% annually", table.growth_rate_pct);
    println!("{}", "=".repeat(88));
    println!(
        "{:<6} {:>22} {:>18} {:>18} {:>10}",
        "Year", "Unbounded Exp.", "Exponential", "Anchored", "Multiple"
    );
    println!("{}", "-".repeat(88));

    for row in &table.rows {
        println!(
            "{:<6} {:>22.2} {:>18.2} {:>18.2} {:>9.1}x{}",
            row.year,
            row.unbounded_exponential,
            row.exponential,
            row.anchored,
            row.anchored_multiple,
            if row.capped { " (capped)" } else { "" }
        );
    }

    if let Some(last) = table.rows.last() {
        let market_cap = last.anchored * BTC_SUPPLY;
        println!("\n{} projection:", last.year);
        println!("  Price per BTC: ${:.2}", last.anchored);
        println!("  Market cap: ${:.2} trillion", market_cap / 1e12);
        println!(
            "  Share of global wealth ($100-300T): {:.1}% - {:.1}%",
            market_cap / GLOBAL_WEALTH_HIGH * 100.0,
            market_cap / GLOBAL_WEALTH_LOW * 100.0
        );
        println!(
            "  Unbounded exponential is {:.0}x the anchored projection",
            last.unbounded_exponential / last.anchored
        );
    }
}
