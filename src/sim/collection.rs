//! Monte-Carlo path collections and their market-quality metrics.

use std::fmt;

use tracing::{debug, info};

use crate::book::Book;
use crate::flow::RandomInfo;
use crate::types::error::{SimError, SimResult};
use crate::types::Side;

use super::path::{Path, PathInfo, PathStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate market-quality metrics over the healthy paths of a collection.
///
/// [`LiquidityMetrics::to_vec`] emits the five scalars in their fixed
/// reporting order: failure rate, shock variance, high-low range, mean
/// bid-ask spread, price-discovery error.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LiquidityMetrics {
    /// Share of paths aborted by a one-sided market collapse.
    pub failure_rate: f64,
    /// Average per-path variance of tick-to-tick mid shocks.
    pub shock_variance: f64,
    /// Average per-path range of the mid price (max minus min).
    pub high_low_range: f64,
    /// Average per-path mean bid-ask spread over quarter snapshots.
    pub mean_bid_ask_spread: f64,
    /// Average per-path mean squared gap between mid and fundamental.
    pub price_discovery_error: f64,
}

impl LiquidityMetrics {
    /// The five metrics in their fixed reporting order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.failure_rate,
            self.shock_variance,
            self.high_low_range,
            self.mean_bid_ask_spread,
            self.price_discovery_error,
        ]
    }
}

impl fmt::Display for LiquidityMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "failure rate          {:.4}", self.failure_rate)?;
        writeln!(f, "shock variance        {:.4}", self.shock_variance)?;
        writeln!(f, "high-low range        {:.4}", self.high_low_range)?;
        writeln!(f, "mean bid-ask spread   {:.4}", self.mean_bid_ask_spread)?;
        write!(f, "price discovery error {:.4}", self.price_discovery_error)
    }
}

/// Variance-like dispersion of the tick-to-tick shocks of a mid series.
///
/// The arithmetic reproduces the simulator's locked reporting exactly: the
/// running mean accumulator starts at the first mid (not at zero) and is
/// divided by the length of the mid series rather than by the number of
/// shocks; the squared deviations then run over the shocks. Series shorter
/// than two samples report zero.
fn shock_variance(mids: &[f64]) -> f64 {
    if mids.len() < 2 {
        return 0.0;
    }
    let mut accumulator = mids[0];
    let mut shocks = Vec::with_capacity(mids.len() - 1);
    for window in mids.windows(2) {
        let shock = window[1] - window[0];
        shocks.push(shock);
        accumulator += shock;
    }
    let mean = accumulator / mids.len() as f64;
    shocks.iter().map(|s| (mean - s).powi(2)).sum::<f64>() / shocks.len() as f64
}

/// Highest minus lowest mid of a series, zero when empty.
fn high_low_range(mids: &[f64]) -> f64 {
    if mids.is_empty() {
        return 0.0;
    }
    let high = mids.iter().copied().fold(f64::MIN, f64::max);
    let low = mids.iter().copied().fold(f64::MAX, f64::min);
    high - low
}

/// Mean bid-ask spread over a path's quarter snapshots, zero when empty.
fn mean_spread(books: &[Book]) -> f64 {
    if books.is_empty() {
        return 0.0;
    }
    books.iter().map(Book::spread).sum::<f64>() / books.len() as f64
}

/// Mean squared gap between snapshot mids and the fundamental recorded in
/// the same quarter (the entry after the series' seed value).
fn price_discovery_error(books: &[Book], fundamentals: &[f64]) -> f64 {
    if books.is_empty() {
        return 0.0;
    }
    let gaps: f64 = books
        .iter()
        .zip(fundamentals.iter().skip(1))
        .map(|(book, fundamental)| (book.mid() - fundamental).powi(2))
        .sum();
    gaps / books.len() as f64
}

/// `n` independent paths sharing one configuration, with path `i` seeded as
/// `base_seed + i`.
///
/// # Example
///
/// ```rust
/// use microhedger::book::Book;
/// use microhedger::flow::RandomInfo;
/// use microhedger::sim::{PathCollection, PathInfo};
///
/// let book = Book::with_levels(
///     &[5.02, 5.04], &[10.0, 10.0],
///     &[4.96, 4.98], &[10.0, 10.0],
/// ).unwrap();
/// let path_info = PathInfo {
///     n_days: 1,
///     n_hours: 2,
///     n_quarters: 2,
///     initial_fundamental: 5.0,
///     initial_book: book,
///     hedger_option_position: 10.0,
///     hedger_implied_volatility: 0.089,
/// };
/// let random_info = RandomInfo {
///     seed: 1,
///     vol_news: 0.0,
///     order_intensity: 1.0,
///     prob_limit: 0.1,
///     prob_informed: 0.3,
///     vol_min: 0.0,
///     vol_max: 1.0,
///     mean_spread: -0.1,
///     vol_spread: 0.1,
///     prob_sign: 0.5,
/// };
/// let mut paths = PathCollection::new(4, path_info, random_info);
/// paths.generate_paths().unwrap();
/// assert_eq!(paths.calc_liquidity_metrics().to_vec().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct PathCollection {
    path_info: PathInfo,
    random_info: RandomInfo,
    paths: Vec<Path>,
}

impl PathCollection {
    /// Creates `n_paths` idle paths from one template configuration.
    #[must_use]
    pub fn new(n_paths: usize, path_info: PathInfo, random_info: RandomInfo) -> Self {
        let paths = (0..n_paths)
            .map(|i| {
                Path::new(
                    path_info.clone(),
                    random_info.with_seed(random_info.seed + i as u64),
                )
            })
            .collect();
        Self {
            path_info,
            random_info,
            paths,
        }
    }

    /// Number of paths in the collection.
    #[must_use]
    pub fn n_paths(&self) -> usize {
        self.paths.len()
    }

    /// Template path configuration.
    #[must_use]
    pub fn path_info(&self) -> &PathInfo {
        &self.path_info
    }

    /// Template driver configuration (base seed).
    #[must_use]
    pub fn random_info(&self) -> &RandomInfo {
        &self.random_info
    }

    /// The generated paths.
    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Generates every path. Paths share no mutable state, so the order of
    /// generation does not affect any observable output.
    pub fn generate_paths(&mut self) -> SimResult<()> {
        for (i, path) in self.paths.iter_mut().enumerate() {
            path.generate()?;
            debug!(path = i, status = ?path.status(), "path finished");
        }
        let healthy = self
            .paths
            .iter()
            .filter(|p| p.status() == PathStatus::Healthy)
            .count();
        info!(
            total = self.paths.len(),
            healthy,
            failed = self.paths.len() - healthy,
            "path generation complete"
        );
        Ok(())
    }

    /// Indices of the paths whose status equals `status`.
    #[must_use]
    pub fn find_paths_with_status(&self, status: PathStatus) -> Vec<usize> {
        self.paths
            .iter()
            .enumerate()
            .filter(|(_, p)| p.status() == status)
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-snapshot total resting volume of one side of a path's book,
    /// negated for bids so that a bid/ask pair brackets zero.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] when `path` is out of range.
    pub fn volume_trajectory(&self, side: Side, path: usize) -> SimResult<Vec<f64>> {
        let path = self.paths.get(path).ok_or_else(|| {
            SimError::InvalidArgument(format!(
                "path index {path} out of range for {} paths",
                self.paths.len()
            ))
        })?;
        Ok(path
            .books()
            .iter()
            .map(|book| side.sign() * book.total_volume(side))
            .collect())
    }

    /// Average of `per_path` over the healthy paths, `0.0` when none are
    /// healthy.
    fn average_over_healthy<F>(&self, per_path: F) -> f64
    where
        F: Fn(&Path) -> f64,
    {
        let healthy: Vec<&Path> = self
            .paths
            .iter()
            .filter(|p| p.status() == PathStatus::Healthy)
            .collect();
        if healthy.is_empty() {
            return 0.0;
        }
        healthy.iter().map(|p| per_path(p)).sum::<f64>() / healthy.len() as f64
    }

    /// Computes the five market-quality metrics, averaging over healthy
    /// paths only; failed paths contribute solely to the failure rate.
    #[must_use]
    pub fn calc_liquidity_metrics(&self) -> LiquidityMetrics {
        let healthy = self.find_paths_with_status(PathStatus::Healthy).len();
        let failure_rate = if self.paths.is_empty() {
            0.0
        } else {
            1.0 - healthy as f64 / self.paths.len() as f64
        };
        LiquidityMetrics {
            failure_rate,
            shock_variance: self.average_over_healthy(|p| shock_variance(p.mid_prices())),
            high_low_range: self.average_over_healthy(|p| high_low_range(p.mid_prices())),
            mean_bid_ask_spread: self.average_over_healthy(|p| mean_spread(p.books())),
            price_discovery_error: self.average_over_healthy(|p| {
                price_discovery_error(p.books(), p.fundamental_prices())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn symmetric_book() -> Book {
        Book::with_decay(
            0.0,
            &[5.02, 5.04, 5.06],
            &[10.0, 10.0, 10.0],
            &[4.94, 4.96, 4.98],
            &[10.0, 10.0, 10.0],
        )
        .unwrap()
    }

    fn path_info() -> PathInfo {
        PathInfo {
            n_days: 2,
            n_hours: 2,
            n_quarters: 4,
            initial_fundamental: 5.0,
            initial_book: symmetric_book(),
            hedger_option_position: 10.0,
            hedger_implied_volatility: 0.089,
        }
    }

    fn random_info() -> RandomInfo {
        RandomInfo {
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
        }
    }

    #[test]
    fn test_shock_variance_quirky_arithmetic() {
        // mids 1, 2, 4 -> shocks 1, 2
        // accumulator seeds with mids[0]: 1 + 1 + 2 = 4; mean = 4 / 3
        // variance over the two shocks around that mean
        let expected = ((4.0 / 3.0 - 1.0_f64).powi(2) + (4.0 / 3.0 - 2.0_f64).powi(2)) / 2.0;
        assert!((shock_variance(&[1.0, 2.0, 4.0]) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_shock_variance_degenerate_series() {
        assert_eq!(shock_variance(&[]), 0.0);
        assert_eq!(shock_variance(&[5.0]), 0.0);
        // a constant series still reports a bias term because the mean
        // accumulator is seeded with the first mid
        let constant = shock_variance(&[2.0, 2.0, 2.0]);
        let mean = 2.0 / 3.0;
        assert!((constant - mean * mean).abs() < EPSILON);
    }

    #[test]
    fn test_high_low_range() {
        assert_eq!(high_low_range(&[]), 0.0);
        assert!((high_low_range(&[5.0, 4.8, 5.3, 5.1]) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_mean_spread_over_snapshots() {
        let narrow = Book::with_levels(&[101.0], &[10.0], &[99.0], &[10.0]).unwrap();
        let wide = Book::with_levels(&[103.0], &[10.0], &[99.0], &[10.0]).unwrap();
        let books = vec![narrow, wide];
        assert!((mean_spread(&books) - 3.0).abs() < EPSILON);
        assert_eq!(mean_spread(&[]), 0.0);
    }

    #[test]
    fn test_price_discovery_pairs_snapshots_with_same_quarter() {
        let book = Book::with_levels(&[101.0], &[10.0], &[99.0], &[10.0]).unwrap();
        let books = vec![book.clone(), book];
        // seed entry 0.0 is skipped; mids are 100 against 99 and 102
        let fundamentals = vec![0.0, 99.0, 102.0];
        let expected = ((100.0 - 99.0_f64).powi(2) + (100.0 - 102.0_f64).powi(2)) / 2.0;
        assert!((price_discovery_error(&books, &fundamentals) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_paths_get_consecutive_seeds() {
        let collection = PathCollection::new(3, path_info(), random_info());
        let seeds: Vec<u64> = collection
            .paths()
            .iter()
            .map(|p| p.random_info().seed)
            .collect();
        assert_eq!(seeds, vec![9999, 10000, 10001]);
    }

    #[test]
    fn test_status_partition_covers_all_paths() {
        let mut collection = PathCollection::new(6, path_info(), random_info());
        collection.generate_paths().unwrap();
        let healthy = collection.find_paths_with_status(PathStatus::Healthy);
        let failed = collection.find_paths_with_status(PathStatus::Failed);
        assert_eq!(healthy.len() + failed.len(), 6);
        for i in healthy {
            assert_eq!(collection.paths()[i].status().code(), 0);
        }
        for i in failed {
            assert_eq!(collection.paths()[i].status().code(), -1);
        }
    }

    #[test]
    fn test_metric_vector_order_and_length() {
        let metrics = LiquidityMetrics {
            failure_rate: 0.1,
            shock_variance: 0.2,
            high_low_range: 0.3,
            mean_bid_ask_spread: 0.4,
            price_discovery_error: 0.5,
        };
        assert_eq!(metrics.to_vec(), vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_failure_rate_matches_status_counts() {
        let mut collection = PathCollection::new(4, path_info(), random_info());
        collection.generate_paths().unwrap();
        let metrics = collection.calc_liquidity_metrics();
        assert!(metrics.failure_rate >= 0.0 && metrics.failure_rate <= 1.0);
        let failed = collection.find_paths_with_status(PathStatus::Failed).len();
        assert!((metrics.failure_rate - failed as f64 / 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_all_paths_fail_when_book_starts_one_sided() {
        let mut info = path_info();
        info.initial_book = Book::with_levels(&[5.02], &[10.0], &[], &[]).unwrap();
        let mut collection = PathCollection::new(3, info, random_info());
        collection.generate_paths().unwrap();
        let metrics = collection.calc_liquidity_metrics();
        assert!((metrics.failure_rate - 1.0).abs() < EPSILON);
        // no healthy paths: the remaining metrics report zero
        assert!(metrics.shock_variance.abs() < EPSILON);
        assert!(metrics.mean_bid_ask_spread.abs() < EPSILON);
    }

    #[test]
    fn test_metrics_are_deterministic() {
        let mut a = PathCollection::new(5, path_info(), random_info());
        let mut b = PathCollection::new(5, path_info(), random_info());
        a.generate_paths().unwrap();
        b.generate_paths().unwrap();
        assert_eq!(
            a.calc_liquidity_metrics().to_vec(),
            b.calc_liquidity_metrics().to_vec()
        );
    }

    #[test]
    fn test_volume_trajectory_signs() {
        let mut collection = PathCollection::new(2, path_info(), random_info());
        collection.generate_paths().unwrap();
        let asks = collection.volume_trajectory(Side::Sell, 0).unwrap();
        let bids = collection.volume_trajectory(Side::Buy, 0).unwrap();
        assert_eq!(asks.len(), collection.paths()[0].books().len());
        assert!(asks.iter().all(|&v| v >= 0.0));
        assert!(bids.iter().all(|&v| v <= 0.0));
        assert!(collection
            .volume_trajectory(Side::Sell, 99)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_display_formats_four_decimals() {
        let metrics = LiquidityMetrics {
            failure_rate: 0.5,
            shock_variance: 0.0027,
            high_low_range: 0.0345,
            mean_bid_ask_spread: 0.0637,
            price_discovery_error: 0.0,
        };
        let rendered = metrics.to_string();
        assert!(rendered.contains("0.5000"));
        assert!(rendered.contains("0.0027"));
        assert!(rendered.contains("0.0637"));
    }
}
