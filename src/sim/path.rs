//! One simulation trajectory.

use tracing::{debug, warn};

use crate::book::{Book, PriceBar};
use crate::flow::{RandomDriver, RandomInfo};
use crate::hedger::Hedger;
use crate::types::error::{SimError, SimResult};
use crate::types::{OrderKind, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Terminal status of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathStatus {
    /// The path ran to completion.
    #[default]
    Healthy,
    /// The path was aborted by a one-sided market collapse.
    Failed,
}

impl PathStatus {
    /// Numeric status code: `0` healthy, `-1` failed.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Healthy => 0,
            Self::Failed => -1,
        }
    }
}

/// Static configuration of a path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathInfo {
    /// Number of trading days.
    pub n_days: usize,
    /// Hours per day.
    pub n_hours: usize,
    /// Quarters per hour.
    pub n_quarters: usize,
    /// Initial fundamental price.
    pub initial_fundamental: f64,
    /// Initial book, including its decay coefficient.
    pub initial_book: Book,
    /// Hedger's option position multiplier.
    pub hedger_option_position: f64,
    /// Hedger's implied volatility.
    pub hedger_implied_volatility: f64,
}

/// One simulation trajectory: the nested day/hour/quarter/tick loop, its
/// recorded series, and the terminal status.
///
/// Snapshot cadence: one book per quarter, one mid per tick, one fundamental
/// per quarter (seeded with the initial value), one delta/gamma per hour.
#[derive(Debug, Clone)]
pub struct Path {
    info: PathInfo,
    random_info: RandomInfo,
    status: PathStatus,
    hedger: Hedger,
    books: Vec<Book>,
    mid_prices: Vec<f64>,
    fundamental_prices: Vec<f64>,
    hedger_deltas: Vec<f64>,
    hedger_gammas: Vec<f64>,
}

impl Path {
    /// Creates an idle path; call [`Path::generate`] to run it.
    #[must_use]
    pub fn new(info: PathInfo, random_info: RandomInfo) -> Self {
        let hedger = Hedger::new(info.hedger_option_position, info.hedger_implied_volatility);
        Self {
            info,
            random_info,
            status: PathStatus::Healthy,
            hedger,
            books: Vec::new(),
            mid_prices: Vec::new(),
            fundamental_prices: Vec::new(),
            hedger_deltas: Vec::new(),
            hedger_gammas: Vec::new(),
        }
    }

    /// Terminal status of the last run.
    #[must_use]
    pub fn status(&self) -> PathStatus {
        self.status
    }

    /// Path configuration.
    #[must_use]
    pub fn info(&self) -> &PathInfo {
        &self.info
    }

    /// Driver configuration (per-path seed included).
    #[must_use]
    pub fn random_info(&self) -> &RandomInfo {
        &self.random_info
    }

    /// The resident hedger.
    #[must_use]
    pub fn hedger(&self) -> &Hedger {
        &self.hedger
    }

    /// Quarter-wise book snapshots, taken after the exogenous flow of each
    /// quarter and before the hedger's re-quote.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Tick-wise mid prices.
    #[must_use]
    pub fn mid_prices(&self) -> &[f64] {
        &self.mid_prices
    }

    /// Fundamental price series: the initial value followed by one shocked
    /// value per quarter.
    #[must_use]
    pub fn fundamental_prices(&self) -> &[f64] {
        &self.fundamental_prices
    }

    /// Hour-wise hedger deltas.
    #[must_use]
    pub fn hedger_deltas(&self) -> &[f64] {
        &self.hedger_deltas
    }

    /// Hour-wise hedger gammas.
    #[must_use]
    pub fn hedger_gammas(&self) -> &[f64] {
        &self.hedger_gammas
    }

    fn clear(&mut self) {
        self.status = PathStatus::Healthy;
        self.hedger = Hedger::new(
            self.info.hedger_option_position,
            self.info.hedger_implied_volatility,
        );
        self.books.clear();
        self.mid_prices.clear();
        self.fundamental_prices.clear();
        self.hedger_deltas.clear();
        self.hedger_gammas.clear();
    }

    /// Runs the trajectory from scratch.
    ///
    /// A [`SimError::LiquidityCrisis`] raised by any book operation marks the
    /// path as failed and terminates it; the partial series stay readable.
    /// Every other error propagates.
    pub fn generate(&mut self) -> SimResult<()> {
        self.clear();
        let mut driver = RandomDriver::new(&self.random_info)?;
        match self.run(&mut driver) {
            Err(SimError::LiquidityCrisis) => {
                self.status = PathStatus::Failed;
                warn!(
                    seed = self.random_info.seed,
                    quarters = self.books.len(),
                    "path aborted on a one-sided book"
                );
                Ok(())
            }
            other => other,
        }
    }

    fn run(&mut self, driver: &mut RandomDriver) -> SimResult<()> {
        debug!(seed = self.random_info.seed, "generating path");
        let mut book = self.info.initial_book.clone();
        book.set_safety_check(true);
        self.fundamental_prices.push(self.info.initial_fundamental);

        for day in 0..self.info.n_days {
            self.hedger.reset_gamma_contract(day as f64, &book)?;
            for hour in 0..self.info.n_hours {
                // the reference fundamental stays stale within the hour
                let fundamental = self
                    .fundamental_prices
                    .last()
                    .copied()
                    .unwrap_or(self.info.initial_fundamental);
                for quarter in 0..self.info.n_quarters {
                    let n_ticks = driver.num_orders();
                    let mut rounds: Vec<Vec<PriceBar>> = Vec::with_capacity(n_ticks);
                    for _tick in 0..n_ticks {
                        book.decay_orders()?;
                        let order = driver.generate_order(book.mid(), fundamental);
                        let executions = book.absorb_general_order(
                            order.kind,
                            order.price,
                            order.volume,
                            order.side,
                        )?;
                        rounds.push(executions);
                        self.mid_prices.push(book.mid());
                    }
                    self.fundamental_prices
                        .push(driver.shocked_price(fundamental));
                    self.books.push(book.clone());

                    if self.hedger.is_own_quote_filled(&rounds) {
                        self.hedger.update_inventory(&rounds);
                    } else {
                        if let Some(side) = Side::from_sign(self.hedger.quote_volume()) {
                            book.cancel_limit_order(
                                side,
                                self.hedger.quote_price(),
                                self.hedger.quote_volume().abs(),
                            )?;
                        }
                        let t_q = quarter as f64 / self.info.n_quarters as f64;
                        let fill = match self.hedger.post_order(&rounds, &book, t_q) {
                            Some(quote) => book.absorb_general_order(
                                OrderKind::Limit,
                                quote.price,
                                quote.volume,
                                quote.side,
                            )?,
                            None => Vec::new(),
                        };
                        self.hedger.update_inventory(&[fill]);
                    }
                }
                let time = day as f64 + (hour + 1) as f64 / self.info.n_hours as f64;
                self.hedger.recalc_greeks(time, &book)?;
                self.hedger_deltas.push(self.hedger.delta());
                self.hedger_gammas.push(self.hedger.gamma());
            }
        }
        Ok(())
    }
}
