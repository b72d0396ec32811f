//! Demo driver: walk a book through its basic operations, then run a small
//! Monte-Carlo batch and log the market-quality metrics.
//!
//! Run with: `cargo run --bin simulate`

use microhedger::prelude::*;
use tracing::info;

fn main() -> SimResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    book_walkthrough()?;
    simulation_run()
}

/// Exercises the order-book operations on a hand-built ladder.
fn book_walkthrough() -> SimResult<()> {
    let mut book = Book::with_levels(
        &[101.0, 102.0, 103.0],
        &[100.0, 200.0, 150.0],
        &[99.0, 98.0, 97.0],
        &[150.0, 100.0, 200.0],
    )?;
    info!("starting book\n{book}");

    info!(
        "orders at 101.0? {:?}; at 100.0? {:?}",
        book.contains_price(101.0)?,
        book.contains_price(100.0)?
    );
    info!(
        "a sell at 104.5 would rest at ask position {}",
        book.price_location(Side::Sell, 104.5)?
    );

    book.add_limit_order(Side::Sell, 104.5, 30.0)?;
    book.add_limit_order(Side::Sell, 104.5, 20.0)?;
    info!("after adding 50 volume of sells at 104.5\n{book}");

    let fill = book.absorb_market_order(Side::Buy, 150.0)?;
    info!(
        "buy market order of 150: {} fills, vwap {:.4}, unfilled {:.1}\n{book}",
        fill.executions.len(),
        fill.vwap,
        fill.unfilled
    );

    let reports = book.absorb_limit_order(Side::Sell, 99.0, 250.0)?;
    info!(
        "crossing sell limit at 99.0: {} fills, one-sided market? {}\n{book}",
        reports.len(),
        book.one_side_empty()
    );
    Ok(())
}

/// Runs a small path collection and reports its liquidity metrics.
fn simulation_run() -> SimResult<()> {
    let initial_book = Book::with_decay(
        0.0,
        &[5.02, 5.04, 5.06],
        &[10.0, 10.0, 10.0],
        &[4.94, 4.96, 4.98],
        &[10.0, 10.0, 10.0],
    )?;
    let path_info = PathInfo {
        n_days: 5,
        n_hours: 5,
        n_quarters: 4,
        initial_fundamental: 5.0,
        initial_book,
        hedger_option_position: 80.0,
        hedger_implied_volatility: 0.089,
    };
    let random_info = RandomInfo {
        seed: 9999,
        vol_news: 0.0,
        order_intensity: 1.0,
        prob_limit: 0.1,
        prob_informed: 0.3,
        vol_min: 0.0,
        vol_max: 1.0,
        mean_spread: -0.1,
        vol_spread: 0.1,
        prob_sign: 0.5,
    };

    let mut paths = PathCollection::new(10, path_info, random_info);
    paths.generate_paths()?;

    let healthy = paths.find_paths_with_status(PathStatus::Healthy);
    info!("healthy paths: {healthy:?}");
    info!("metrics\n{}", paths.calc_liquidity_metrics());
    Ok(())
}
