//! Bitcoin investment calculator CLI
//!
//! Values a BTC purchase against today's price or a projected future price

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use btc_calculator::{
    chart::ChartSeries,
    forecast::ModelSummary,
    Amount, CachedPriceSource, Calculator, CoinGeckoClient, Comparison, DashboardConfig,
    InvestmentQuery, InvestmentSummary, PriceQuote, Strategy, YearMonth,
};
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "btc-calc", version, about = "Historical and projected Bitcoin investment value")]
struct Args {
    /// Amount of BTC bought
    #[arg(long, conflicts_with = "usd")]
    btc: Option<f64>,

    /// USD invested at the purchase date
    #[arg(long)]
    usd: Option<f64>,

    /// Purchase month (YYYY-MM)
    #[arg(long)]
    purchase: YearMonth,

    /// Value at this future month (YYYY-MM) instead of today
    #[arg(long)]
    target: Option<YearMonth>,

    /// Projection model
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the live price fetch and use the fallback price
    #[arg(long)]
    offline: bool,

    /// Use this as the current price instead of fetching
    #[arg(long, conflicts_with = "offline")]
    price: Option<f64>,

    /// Treat this month (YYYY-MM) as the current month
    #[arg(long)]
    today: Option<YearMonth>,

    /// Include the price history series
    #[arg(long)]
    chart: bool,

    /// Emit JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a InvestmentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a ModelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<&'a ChartSeries>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_json_path(path)?,
        None => DashboardConfig::default(),
    };
    config.apply_env()?;
    if let Some(strategy) = args.strategy {
        config.forecast.strategy = strategy;
    }

    let calculator = Calculator::from_config(&config).context("Invalid configuration")?;
    let today = args.today.unwrap_or_else(YearMonth::current);

    let quote = if let Some(price) = args.price {
        PriceQuote {
            price,
            live: false,
            notice: Some(format!("Using supplied current price ${:.0}.", price)),
        }
    } else if args.offline {
        PriceQuote::offline(config.market.fallback_price)
    } else {
        let client = CoinGeckoClient::new(&config.market)?;
        let source = CachedPriceSource::new(client, Duration::from_secs(config.market.cache_ttl_secs));
        PriceQuote::resolve(&source, config.market.fallback_price)
    };

    let amount = match (args.btc, args.usd) {
        (_, Some(usd)) => Amount::Usd(usd),
        (Some(btc), None) => Amount::Btc(btc),
        (None, None) => Amount::Btc(calculator.limits().default_btc),
    };
    let query = InvestmentQuery {
        amount,
        purchase_date: args.purchase,
        comparison: args.target.map_or(Comparison::Today, Comparison::Future),
    };

    let summary = calculator.evaluate(&query, today, &quote)?;
    let model = summary
        .is_projection
        .then(|| calculator.engine().model_summary(quote.price, today));
    let chart = if args.chart {
        Some(calculator.series(
            summary.purchase_date,
            summary.comparison_date,
            summary.position.btc_amount,
            today,
            &quote,
        )?)
    } else {
        None
    };

    if args.json {
        let report = Report {
            summary: &summary,
            model: model.as_ref(),
            chart: chart.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&summary);
    if let Some(model) = &model {
        println!("\nProjection Model:");
        println!("{}", model);
    }
    if let Some(series) = &chart {
        print_chart(series);
    }
    Ok(())
}

fn print_summary(summary: &InvestmentSummary) {
    println!("Bitcoin Investment Calculator v{}", env!("CARGO_PKG_VERSION"));
    println!("=================================\n");

    if let Some(notice) = &summary.price_notice {
        println!("Note: {}\n", notice);
    }

    let position = &summary.position;
    let valuation = &summary.valuation;
    let value_label = if summary.is_projection { "Projected" } else { "Current" };

    println!("Purchase:");
    println!("  Date: {}", summary.purchase_date.label());
    if summary.purchase_price_date != summary.purchase_date {
        println!("  (approximate price from {})", summary.purchase_price_date.label());
    }
    println!("  BTC Price: ${:.2}", position.purchase_price);
    println!("  BTC Amount: {:.8}", position.btc_amount);
    println!("  Value: ${:.2}", position.purchase_value);
    println!();
    println!("{} ({}):", value_label, summary.comparison_date.label());
    println!("  BTC Price: ${:.2}", valuation.price);
    println!("  Value: ${:.2}", valuation.current_value);
    println!(
        "  Profit/Loss: ${:.2} ({:+.2}%)",
        valuation.profit_loss, valuation.profit_loss_pct
    );

    if let Some(projection) = &summary.projection {
        println!("  Model: {:?}{}", projection.method, if projection.capped { " (capped)" } else { "" });
        println!("\nFuture projections are estimates for educational purposes only. This is not financial advice.");
    }
}

fn print_chart(series: &ChartSeries) {
    println!(
        "\nPrice History ({} points, every {} month(s)):",
        series.points.len(),
        series.step_months
    );
    println!("{:>8} {:>16} {:>18} {:>10}", "Month", "BTC Price", "Portfolio", "Projected");
    println!("{}", "-".repeat(56));
    for point in &series.points {
        println!(
            "{:>8} {:>16.2} {:>18.2} {:>10}",
            point.date.to_string(),
            point.price,
            point.portfolio_value,
            if point.projected { "yes" } else { "" }
        );
    }

    let stats = series.stats();
    println!("\nSummary:");
    println!("  Price: min ${:.2}, max ${:.2}, avg ${:.2}", stats.min_price, stats.max_price, stats.avg_price);
    println!(
        "  Portfolio: min ${:.2}, max ${:.2}, avg ${:.2}",
        stats.min_portfolio, stats.max_portfolio, stats.avg_portfolio
    );
}
