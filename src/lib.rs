//! Market Microstructure Hedging Simulator
//!
//! A discrete-event simulator of a single-asset continuous double-auction
//! market with a resident delta-gamma option hedger. Given a seeded random
//! driver and an initial book state, it generates many independent price
//! paths, records the evolution of the limit order book and the hedger's
//! inventory, and reports aggregate market-quality metrics: failure rate,
//! realized volatility, bid-ask liquidity, and price discovery.
//!
//! # Overview
//!
//! Three subsystems carry the simulation:
//!
//! - **The order book** ([`book`]): two tick-aware price ladders absorbing
//!   limit and market orders, with resting-volume decay and strict
//!   no-crossing invariants.
//! - **The path engine** ([`sim`]): the nested day/hour/quarter/tick loop
//!   driving book mutation from seeded stochastic order flow ([`flow`]),
//!   with per-path failure detection and a metric reducer over many paths.
//! - **The hedger** ([`hedger`]): a delta-gamma hedger that re-strikes a
//!   straddle daily ([`options`]), watches the tape for fills of its single
//!   outstanding quote, and re-quotes on a schedule that walks from passive
//!   to marketable as the hour ages.
//!
//! # Determinism
//!
//! Every source of randomness is a [`flow::RandomDriver`] seeded through its
//! configuration; identical configurations reproduce identical simulations,
//! metric for metric. Path `i` of a collection runs under `base_seed + i`.
//!
//! # Quick Start
//!
//! ```rust
//! use microhedger::prelude::*;
//!
//! let book = Book::with_levels(
//!     &[5.02, 5.04, 5.06], &[10.0, 10.0, 10.0],
//!     &[4.94, 4.96, 4.98], &[10.0, 10.0, 10.0],
//! ).unwrap();
//! let path_info = PathInfo {
//!     n_days: 1,
//!     n_hours: 2,
//!     n_quarters: 4,
//!     initial_fundamental: 5.0,
//!     initial_book: book,
//!     hedger_option_position: 10.0,
//!     hedger_implied_volatility: 0.089,
//! };
//! let random_info = RandomInfo {
//!     seed: 9999,
//!     vol_news: 0.0,
//!     order_intensity: 1.0,
//!     prob_limit: 0.1,
//!     prob_informed: 0.3,
//!     vol_min: 0.0,
//!     vol_max: 1.0,
//!     mean_spread: -0.1,
//!     vol_spread: 0.1,
//!     prob_sign: 0.5,
//! };
//!
//! let mut paths = PathCollection::new(10, path_info, random_info);
//! paths.generate_paths().unwrap();
//! let metrics = paths.calc_liquidity_metrics();
//! assert_eq!(metrics.to_vec().len(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

/// Two-sided limit order book: price bars, ladders, absorption, decay.
pub mod book;

/// Seeded stochastic order flow: news shocks, order counts, order specs.
pub mod flow;

/// The resident delta-gamma hedger.
pub mod hedger;

/// Option legs and their greeks under a normal-diffusion spot model.
pub mod options;

/// The Monte-Carlo path engine: paths, collections, metrics, scenarios.
pub mod sim;

/// Common types, errors, and the tick-size configuration.
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude;
