//! Seeded stochastic order flow.
//!
//! A [`RandomDriver`] is the only source of randomness in a simulation. It is
//! a deterministic function of its [`RandomInfo`]: two drivers built from the
//! same configuration emit identical sequences of news shocks, order counts,
//! and order specifications. Path `i` of a collection is conventionally
//! seeded with `base_seed + i`.

use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Normal, Poisson};

use crate::types::error::{SimError, SimResult};
use crate::types::{OrderKind, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration of a [`RandomDriver`].
///
/// All probabilities live in `[0, 1]` and `vol_min <= vol_max`; violations
/// surface as [`SimError::InvalidArgument`] when the driver is built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RandomInfo {
    /// Seed of the underlying generator.
    pub seed: u64,
    /// Standard deviation of the additive fundamental news shock.
    pub vol_news: f64,
    /// Poisson intensity of order arrival per quarter.
    pub order_intensity: f64,
    /// Probability that an exogenous order is a limit order.
    pub prob_limit: f64,
    /// Probability that an exogenous order is informed.
    pub prob_informed: f64,
    /// Lower bound of the uniform order volume.
    pub vol_min: f64,
    /// Upper bound of the uniform order volume.
    pub vol_max: f64,
    /// Mean offset from the reference price for limit-order placement.
    pub mean_spread: f64,
    /// Standard deviation of the placement offset.
    pub vol_spread: f64,
    /// Probability parameter of the order-sign draw (a success is a sell).
    pub prob_sign: f64,
}

impl RandomInfo {
    /// The same configuration under a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// One exogenous order emitted by the driver.
///
/// `price` is meaningful for limit orders only; market orders execute at
/// whatever the opposite ladder offers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderSpec {
    /// Limit or market.
    pub kind: OrderKind,
    /// Placement price for limit orders, `0.0` for market orders.
    pub price: f64,
    /// Unsigned order volume.
    pub volume: f64,
    /// Side of the order.
    pub side: Side,
}

/// Seeded source of news shocks, order counts, and order specifications.
///
/// # Example
///
/// ```rust
/// use microhedger::flow::{RandomDriver, RandomInfo};
///
/// let info = RandomInfo {
///     seed: 42,
///     vol_news: 0.0,
///     order_intensity: 1.0,
///     prob_limit: 0.5,
///     prob_informed: 0.3,
///     vol_min: 0.0,
///     vol_max: 1.0,
///     mean_spread: -0.1,
///     vol_spread: 0.1,
///     prob_sign: 0.5,
/// };
/// let mut driver = RandomDriver::new(&info).unwrap();
/// // zero news volatility leaves the fundamental untouched
/// assert_eq!(driver.shocked_price(5.0), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct RandomDriver {
    rng: StdRng,
    news: Normal<f64>,
    order_count: Poisson<f64>,
    order_type: Bernoulli,
    informed: Bernoulli,
    volume: Uniform<f64>,
    spread: Normal<f64>,
    sign: Bernoulli,
}

impl RandomDriver {
    /// Builds a driver from its configuration.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] for probabilities outside `[0, 1]`,
    /// a non-positive order intensity, negative volatilities, or
    /// `vol_min > vol_max`.
    pub fn new(info: &RandomInfo) -> SimResult<Self> {
        if !(info.vol_min <= info.vol_max) {
            return Err(SimError::InvalidArgument(
                "volume bounds must satisfy vol_min <= vol_max".to_string(),
            ));
        }
        let news = Normal::new(0.0, info.vol_news)
            .map_err(|e| SimError::InvalidArgument(format!("news volatility: {e}")))?;
        let order_count = Poisson::new(info.order_intensity)
            .map_err(|e| SimError::InvalidArgument(format!("order intensity: {e}")))?;
        let order_type = Bernoulli::new(info.prob_limit)
            .map_err(|e| SimError::InvalidArgument(format!("limit-order probability: {e}")))?;
        let informed = Bernoulli::new(info.prob_informed)
            .map_err(|e| SimError::InvalidArgument(format!("informed probability: {e}")))?;
        let spread = Normal::new(info.mean_spread, info.vol_spread)
            .map_err(|e| SimError::InvalidArgument(format!("spread volatility: {e}")))?;
        let sign = Bernoulli::new(info.prob_sign)
            .map_err(|e| SimError::InvalidArgument(format!("sign probability: {e}")))?;
        Ok(Self {
            rng: StdRng::seed_from_u64(info.seed),
            news,
            order_count,
            order_type,
            informed,
            volume: Uniform::new_inclusive(info.vol_min, info.vol_max),
            spread,
            sign,
        })
    }

    /// The previous fundamental price plus one news shock.
    pub fn shocked_price(&mut self, previous: f64) -> f64 {
        previous + self.news.sample(&mut self.rng)
    }

    /// Number of exogenous orders arriving in the next quarter.
    pub fn num_orders(&mut self) -> usize {
        self.order_count.sample(&mut self.rng) as usize
    }

    /// Draws one exogenous order.
    ///
    /// Informed market orders sell when `mid` sits above `fundamental` and
    /// buy otherwise; uninformed sides come from the sign draw. Informed
    /// limit orders anchor on the fundamental, uninformed ones on the mid;
    /// either way the placement offset is a normal draw whose sign may flip
    /// the quote onto the wrong side of the reference, which is the
    /// simulator's source of crossing limit orders.
    pub fn generate_order(&mut self, mid: f64, fundamental: f64) -> OrderSpec {
        let kind = if self.order_type.sample(&mut self.rng) {
            OrderKind::Limit
        } else {
            OrderKind::Market
        };
        let volume = self.volume.sample(&mut self.rng);
        let informed = self.informed.sample(&mut self.rng);
        match kind {
            OrderKind::Market => {
                let side = if informed {
                    if mid > fundamental {
                        Side::Sell
                    } else {
                        Side::Buy
                    }
                } else {
                    self.draw_sign()
                };
                OrderSpec {
                    kind,
                    price: 0.0,
                    volume,
                    side,
                }
            }
            OrderKind::Limit => {
                let side = self.draw_sign();
                let reference = if informed { fundamental } else { mid };
                let price = reference + side.sign() * self.spread.sample(&mut self.rng);
                OrderSpec {
                    kind,
                    price,
                    volume,
                    side,
                }
            }
        }
    }

    fn draw_sign(&mut self) -> Side {
        if self.sign.sample(&mut self.rng) {
            Side::Sell
        } else {
            Side::Buy
        }
    }
}
