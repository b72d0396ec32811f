//! The Monte-Carlo path engine.
//!
//! A [`Path`] drives one trajectory through the nested day/hour/quarter/tick
//! loop: the seeded order flow mutates a working book, the hedger reacts to
//! the realized tape, and the path records book snapshots, mid prices,
//! fundamentals, and hedger greeks along the way. A [`PathCollection`] runs
//! `n` such paths under consecutive seeds and reduces them to the
//! market-quality metrics of [`LiquidityMetrics`].
//!
//! [`generate_scenarios`] fans a [`SimConfig`] template out into a parameter
//! sweep.

mod collection;
mod path;
mod scenario;

pub use collection::{LiquidityMetrics, PathCollection};
pub use path::{Path, PathInfo, PathStatus};
pub use scenario::{generate_scenarios, SimConfig};
