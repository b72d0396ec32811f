//! A single aggregated price level.

use crate::types::tick::{snap_to_grid, tick_size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of executing incoming volume against a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarStatus {
    /// The bar still carries volume and stays in the book.
    Keep,
    /// The bar's volume drained to (within epsilon of) zero; remove it.
    Remove,
}

/// One aggregate price level: a price on the tick grid and the total volume
/// resting at it.
///
/// Inside a [`Book`](crate::book::Book) the volume is non-negative. When a
/// `PriceBar` travels as an *execution report* the sign of the volume encodes
/// the side of the liquidity that was consumed: positive for resting sells,
/// negative for resting buys.
///
/// The price is snapped onto the process-wide tick grid on construction, so
/// two bars built from raw prices less than a tick apart compare equal.
///
/// # Example
///
/// ```rust
/// use microhedger::book::{BarStatus, PriceBar};
///
/// let mut bar = PriceBar::new(101.0, 100.0);
/// assert!(bar.price_same_as(101.0));
/// assert!(bar.price_higher_than(100.5));
///
/// let (remaining, status) = bar.execute_against(40.0);
/// assert_eq!(remaining, 0.0);
/// assert_eq!(status, BarStatus::Keep);
/// assert_eq!(bar.volume(), 60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceBar {
    price: f64,
    volume: f64,
}

impl PriceBar {
    /// Creates a bar at `price` (snapped to the tick grid) carrying `volume`.
    #[must_use]
    pub fn new(price: f64, volume: f64) -> Self {
        Self {
            price: snap_to_grid(price),
            volume,
        }
    }

    /// The empty bar: zero price, zero volume.
    ///
    /// Used as the "no outstanding quote" sentinel by the hedger.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Price of this level, on the tick grid.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Volume resting at this level. Signed when used as an execution report.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// True when the price is below tick resolution, i.e. the bar does not
    /// denote a real level.
    #[must_use]
    pub fn is_empty_bar(&self) -> bool {
        self.price.abs() < tick_size() / 2.0
    }

    /// True when the volume is within machine epsilon of zero.
    #[must_use]
    pub fn is_empty_volume(&self) -> bool {
        self.volume.abs() < f64::EPSILON
    }

    /// True when both price and volume are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_empty_bar() && self.is_empty_volume()
    }

    /// Tick-aware price equality against a raw price.
    #[must_use]
    pub fn price_same_as(&self, price: f64) -> bool {
        (self.price - snap_to_grid(price)).abs() < f64::EPSILON
    }

    /// Tick-aware strict `>` against a raw price.
    #[must_use]
    pub fn price_higher_than(&self, price: f64) -> bool {
        self.price > snap_to_grid(price) - f64::EPSILON && !self.price_same_as(price)
    }

    /// Tick-aware strict `<` against a raw price.
    #[must_use]
    pub fn price_lower_than(&self, price: f64) -> bool {
        self.price < snap_to_grid(price) + f64::EPSILON && !self.price_same_as(price)
    }

    /// Tick-aware `>=` against a raw price.
    #[must_use]
    pub fn price_higher_equal(&self, price: f64) -> bool {
        self.price_higher_than(price) || self.price_same_as(price)
    }

    /// Tick-aware `<=` against a raw price.
    #[must_use]
    pub fn price_lower_equal(&self, price: f64) -> bool {
        self.price_lower_than(price) || self.price_same_as(price)
    }

    /// Executes incoming volume against this bar.
    ///
    /// Consumes `min(self.volume, incoming)` from both operands and returns
    /// the unexecuted remainder of `incoming` together with whether the bar
    /// should stay in the book.
    pub fn execute_against(&mut self, incoming: f64) -> (f64, BarStatus) {
        let executed = self.volume.min(incoming);
        self.volume -= executed;
        let remaining = incoming - executed;
        let status = if self.volume.abs() < f64::EPSILON {
            BarStatus::Remove
        } else {
            BarStatus::Keep
        };
        (remaining, status)
    }

    /// Adds signed `delta` to the volume unconditionally.
    ///
    /// Callers enforce non-negativity where the bar lives inside a book.
    pub fn add_volume(&mut self, delta: f64) {
        self.volume += delta;
    }
}

impl Default for PriceBar {
    fn default() -> Self {
        Self::empty()
    }
}
