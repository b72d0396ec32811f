//! Two-sided limit order book.
//!
//! The book keeps one price-ascending ladder per side, with at most one
//! [`PriceBar`] per price level (same-price adds accumulate volume). Best bid
//! is the last bar of the bid ladder; best ask is the first bar of the ask
//! ladder. Whenever both sides are non-empty the book guarantees
//! `best_bid < best_ask`; operations that would cross the ladders fail
//! instead of silently repairing the book.
//!
//! A book also carries a decay coefficient for resting-order attrition and a
//! safety-check flag. With the flag set, every read-or-mutate operation first
//! verifies that both sides are populated and fails with
//! [`SimError::LiquidityCrisis`] otherwise; the path engine uses this to
//! detect one-sided market failure.

pub mod bar;

use std::fmt;

use crate::types::error::{SimError, SimResult};
use crate::types::{OrderKind, Side};

pub use bar::{BarStatus, PriceBar};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of sweeping a market order through the opposite ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketFill {
    /// One report per level consumed, in execution order. The sign of each
    /// report's volume encodes the side of the resting liquidity.
    pub executions: Vec<PriceBar>,
    /// Volume-weighted average price of the fills, `0.0` if nothing filled.
    pub vwap: f64,
    /// Incoming volume left unexecuted after the sweep.
    pub unfilled: f64,
}

/// A two-sided limit order book.
///
/// # Example
///
/// ```rust
/// use microhedger::book::Book;
/// use microhedger::types::Side;
///
/// let mut book = Book::with_levels(
///     &[101.0, 102.0],
///     &[100.0, 200.0],
///     &[99.0, 98.0],
///     &[150.0, 100.0],
/// )
/// .unwrap();
///
/// assert_eq!(book.bid(), 99.0);
/// assert_eq!(book.ask(), 101.0);
/// assert_eq!(book.mid(), 100.0);
///
/// let fill = book.absorb_market_order(Side::Buy, 150.0).unwrap();
/// assert_eq!(fill.executions.len(), 2);
/// assert_eq!(fill.unfilled, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Book {
    /// Buy orders, ascending by price; best bid is the last bar.
    bids: Vec<PriceBar>,
    /// Sell orders, ascending by price; best ask is the first bar.
    asks: Vec<PriceBar>,
    decay_coefficient: f64,
    safety_check: bool,
}

impl Book {
    /// Creates an empty book with a zero decay coefficient.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: Vec::new(),
            asks: Vec::new(),
            decay_coefficient: 0.0,
            safety_check: false,
        }
    }

    /// Builds a book from per-side price and volume slices.
    ///
    /// The slices need not be sorted; each side is ordered by price while the
    /// price/volume pairing is preserved.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] if a side's price and volume slices have
    /// different lengths.
    pub fn with_levels(
        ask_prices: &[f64],
        ask_volumes: &[f64],
        bid_prices: &[f64],
        bid_volumes: &[f64],
    ) -> SimResult<Self> {
        Self::with_decay(0.0, ask_prices, ask_volumes, bid_prices, bid_volumes)
    }

    /// Builds a book as [`Book::with_levels`] and stores a decay coefficient
    /// for [`Book::decay_orders`].
    pub fn with_decay(
        decay_coefficient: f64,
        ask_prices: &[f64],
        ask_volumes: &[f64],
        bid_prices: &[f64],
        bid_volumes: &[f64],
    ) -> SimResult<Self> {
        if ask_prices.len() != ask_volumes.len() || bid_prices.len() != bid_volumes.len() {
            return Err(SimError::InvalidArgument(
                "price and volume slices must have matching lengths".to_string(),
            ));
        }
        let ladder = |prices: &[f64], volumes: &[f64]| -> Vec<PriceBar> {
            let mut levels: Vec<(f64, f64)> = prices
                .iter()
                .copied()
                .zip(volumes.iter().copied())
                .collect();
            levels.sort_by(|a, b| a.0.total_cmp(&b.0));
            levels
                .into_iter()
                .map(|(price, volume)| PriceBar::new(price, volume))
                .collect()
        };
        Ok(Self {
            bids: ladder(bid_prices, bid_volumes),
            asks: ladder(ask_prices, ask_volumes),
            decay_coefficient,
            safety_check: false,
        })
    }

    /// Best bid price, `0.0` when the bid side is empty.
    #[must_use]
    pub fn bid(&self) -> f64 {
        self.bids.last().map_or(0.0, PriceBar::price)
    }

    /// Best ask price, `0.0` when the ask side is empty.
    #[must_use]
    pub fn ask(&self) -> f64 {
        self.asks.first().map_or(0.0, PriceBar::price)
    }

    /// Mid price, `(bid + ask) / 2`.
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.ask() + self.bid()) * 0.5
    }

    /// Bid-ask spread, `ask - bid`.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.ask() - self.bid()
    }

    /// True when at least one side holds no orders.
    #[must_use]
    pub fn one_side_empty(&self) -> bool {
        self.asks.is_empty() || self.bids.is_empty()
    }

    /// Number of price levels on `side`.
    #[must_use]
    pub fn depth(&self, side: Side) -> usize {
        self.ladder(side).len()
    }

    /// Sum of resting volumes on `side` (unsigned).
    #[must_use]
    pub fn total_volume(&self, side: Side) -> f64 {
        self.ladder(side).iter().map(PriceBar::volume).sum()
    }

    /// Decay coefficient used by [`Book::decay_orders`].
    #[must_use]
    pub fn decay_coefficient(&self) -> f64 {
        self.decay_coefficient
    }

    /// Whether one-sided-book safety checks are active.
    #[must_use]
    pub fn safety_check(&self) -> bool {
        self.safety_check
    }

    /// Enables or disables one-sided-book safety checks.
    pub fn set_safety_check(&mut self, enabled: bool) {
        self.safety_check = enabled;
    }

    fn ladder(&self, side: Side) -> &Vec<PriceBar> {
        match side {
            Side::Sell => &self.asks,
            Side::Buy => &self.bids,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut Vec<PriceBar> {
        match side {
            Side::Sell => &mut self.asks,
            Side::Buy => &mut self.bids,
        }
    }

    fn check_liquidity(&self) -> SimResult<()> {
        if self.safety_check && self.one_side_empty() {
            return Err(SimError::LiquidityCrisis);
        }
        Ok(())
    }

    /// The bar at position `pos` of `side`, with negative positions indexing
    /// from the end of the ladder.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] when `pos` is out of range, and
    /// [`SimError::LiquidityCrisis`] under active safety checks with a
    /// one-sided book.
    pub fn bar_at(&self, side: Side, pos: isize) -> SimResult<&PriceBar> {
        self.check_liquidity()?;
        let ladder = self.ladder(side);
        let len = ladder.len() as isize;
        if pos >= len || pos < -len {
            return Err(SimError::InvalidArgument(format!(
                "bar position {pos} out of range for a ladder of {len} levels"
            )));
        }
        let index = if pos >= 0 { pos } else { len + pos } as usize;
        Ok(&ladder[index])
    }

    /// Price at position `pos` of `side` (see [`Book::bar_at`]).
    pub fn price_at(&self, side: Side, pos: isize) -> SimResult<f64> {
        Ok(self.bar_at(side, pos)?.price())
    }

    /// Volume at position `pos` of `side` (see [`Book::bar_at`]).
    pub fn volume_at(&self, side: Side, pos: isize) -> SimResult<f64> {
        Ok(self.bar_at(side, pos)?.volume())
    }

    /// Reports which side, if any, holds a bar at `price` (tick tolerance).
    ///
    /// Prices strictly inside the bid-ask spread are rejected without a scan.
    pub fn contains_price(&self, price: f64) -> SimResult<Option<Side>> {
        self.check_liquidity()?;
        if price > self.bid() && price < self.ask() {
            return Ok(None);
        }
        let side = if price <= self.bid() {
            Side::Buy
        } else {
            Side::Sell
        };
        let found = self
            .ladder(side)
            .iter()
            .any(|bar| bar.price_same_as(price));
        Ok(found.then_some(side))
    }

    /// Index at which a bar at `price` should be inserted into `side` to keep
    /// the ladder price-ascending. Returns the ladder length when `price`
    /// exceeds every existing level.
    pub fn price_location(&self, side: Side, price: f64) -> SimResult<usize> {
        self.check_liquidity()?;
        let ladder = self.ladder(side);
        Ok(ladder
            .iter()
            .position(|bar| bar.price_higher_equal(price))
            .unwrap_or(ladder.len()))
    }

    /// True when a resting limit at `price` on `side` would be immediately
    /// marketable against the opposite ladder.
    fn limit_is_marketable(&self, side: Side, price: f64) -> bool {
        match side {
            Side::Sell => !self.bids.is_empty() && price <= self.bid(),
            Side::Buy => !self.asks.is_empty() && price >= self.ask(),
        }
    }

    /// Adds a non-crossing limit order of `volume` at `price` on `side`.
    ///
    /// Three cases apply: a fresh price level is inserted in order; an
    /// existing same-side level accumulates the volume; an opposite-side
    /// level at the same price is executed against, recursing with the
    /// remainder if the level drains.
    ///
    /// # Errors
    ///
    /// [`SimError::IllegalState`] when the order would cross the book beyond
    /// an opposite-side level at exactly `price`; crossing limits must be
    /// routed through [`Book::absorb_limit_order`].
    pub fn add_limit_order(&mut self, side: Side, price: f64, volume: f64) -> SimResult<()> {
        self.check_liquidity()?;
        let mut volume = volume;
        loop {
            match self.contains_price(price)? {
                None => {
                    if self.limit_is_marketable(side, price) {
                        return Err(SimError::IllegalState(format!(
                            "cannot rest a {side} limit at {price} inside the opposite ladder"
                        )));
                    }
                    let at = self.price_location(side, price)?;
                    self.ladder_mut(side).insert(at, PriceBar::new(price, volume));
                    return Ok(());
                }
                Some(existing) if existing == side => {
                    let at = self.price_location(side, price)?;
                    self.ladder_mut(side)[at].add_volume(volume);
                    return Ok(());
                }
                Some(other) => {
                    let beyond_touch = match side {
                        Side::Sell => price < self.bid(),
                        Side::Buy => price > self.ask(),
                    };
                    if beyond_touch {
                        return Err(SimError::IllegalState(format!(
                            "cannot post a {side} limit at {price} beyond the opposite touch"
                        )));
                    }
                    let at = self.price_location(other, price)?;
                    let ladder = self.ladder_mut(other);
                    let (remaining, _) = ladder[at].execute_against(volume);
                    if ladder[at].volume().abs() < f64::EPSILON {
                        ladder.remove(at);
                        if remaining > f64::EPSILON {
                            volume = remaining;
                            continue;
                        }
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Cancels up to `volume` resting at `price` on `side`.
    ///
    /// A level whose volume falls below machine epsilon is removed. No-op if
    /// the price is not resting on that side.
    pub fn cancel_limit_order(&mut self, side: Side, price: f64, volume: f64) -> SimResult<()> {
        self.check_liquidity()?;
        match self.contains_price(price)? {
            Some(existing) if existing == side => {
                let at = self.price_location(side, price)?;
                let ladder = self.ladder_mut(side);
                ladder[at].add_volume(-volume);
                if ladder[at].volume() < f64::EPSILON {
                    ladder.remove(at);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Absorbs a market order of `volume` on `side`, walking the opposite
    /// ladder in price priority until the volume is exhausted or the ladder
    /// empties.
    pub fn absorb_market_order(&mut self, side: Side, volume: f64) -> SimResult<MarketFill> {
        self.check_liquidity()?;
        let mut executions = Vec::new();
        let mut unfilled = volume;
        let vwap = self.sweep_opposite(&mut executions, &mut unfilled, side);
        Ok(MarketFill {
            executions,
            vwap,
            unfilled,
        })
    }

    /// Executes the marketable portion of the order against the opposite
    /// ladder's best levels, appending a report per level consumed. Returns
    /// the volume-weighted average fill price, `0.0` when nothing filled.
    fn sweep_opposite(
        &mut self,
        executions: &mut Vec<PriceBar>,
        volume: &mut f64,
        side: Side,
    ) -> f64 {
        let opposite = side.opposite();
        let mut filled = 0.0;
        let mut notional = 0.0;
        while *volume > f64::EPSILON && !self.ladder(opposite).is_empty() {
            let ladder = self.ladder_mut(opposite);
            let at = match opposite {
                Side::Sell => 0,
                Side::Buy => ladder.len() - 1,
            };
            let before = *volume;
            let (remaining, _) = ladder[at].execute_against(*volume);
            *volume = remaining;
            let executed = before - remaining;
            let level_price = ladder[at].price();
            filled += executed;
            notional += executed * level_price;
            if ladder[at].volume() < f64::EPSILON {
                ladder.remove(at);
            }
            executions.push(PriceBar::new(level_price, opposite.sign() * executed));
        }
        if filled.abs() > f64::EPSILON {
            notional / filled
        } else {
            0.0
        }
    }

    /// Absorbs a limit order that may cross the book.
    ///
    /// While the order is marketable (a sell priced at or below the best bid,
    /// a buy at or above the best ask), one best-level's worth is executed as
    /// a market order and legality is re-checked. Any residual volume then
    /// rests on `side` through the usual insert-or-accumulate path.
    ///
    /// Returns the execution reports of every level consumed.
    pub fn absorb_limit_order(
        &mut self,
        side: Side,
        price: f64,
        volume: f64,
    ) -> SimResult<Vec<PriceBar>> {
        self.check_liquidity()?;
        let mut executions = Vec::new();
        let mut volume = volume;
        while self.limit_is_marketable(side, price) && volume > f64::EPSILON {
            let opposite = side.opposite();
            let top_volume = {
                let ladder = self.ladder(opposite);
                match opposite {
                    Side::Sell => ladder[0].volume(),
                    Side::Buy => ladder[ladder.len() - 1].volume(),
                }
            };
            let mut tranche = top_volume.min(volume);
            volume -= tranche;
            self.sweep_opposite(&mut executions, &mut tranche, side);
        }
        if volume > f64::EPSILON {
            match self.contains_price(price)? {
                Some(existing) if existing == side => {
                    let at = self.price_location(side, price)?;
                    self.ladder_mut(side)[at].add_volume(volume);
                }
                _ => {
                    let at = self.price_location(side, price)?;
                    self.ladder_mut(side).insert(at, PriceBar::new(price, volume));
                }
            }
        }
        Ok(executions)
    }

    /// Dispatches an incoming order by kind and returns its execution
    /// reports. Market orders ignore `price`.
    pub fn absorb_general_order(
        &mut self,
        kind: OrderKind,
        price: f64,
        volume: f64,
        side: Side,
    ) -> SimResult<Vec<PriceBar>> {
        self.check_liquidity()?;
        match kind {
            OrderKind::Limit => self.absorb_limit_order(side, price, volume),
            OrderKind::Market => Ok(self.absorb_market_order(side, volume)?.executions),
        }
    }

    /// Decays every resting order with the book's stored coefficient.
    pub fn decay_orders(&mut self) -> SimResult<()> {
        self.decay_orders_with(self.decay_coefficient)
    }

    /// Decays every resting order: each bar's volume is multiplied by
    /// `exp(-coefficient * (mid - price)^2)`, so bars far from the mid decay
    /// fastest. Decay never removes a bar; arbitrarily small levels stay
    /// until an execution drains them.
    pub fn decay_orders_with(&mut self, coefficient: f64) -> SimResult<()> {
        self.check_liquidity()?;
        let mid = self.mid();
        for bar in self.asks.iter_mut().chain(self.bids.iter_mut()) {
            let factor = (-coefficient * (mid - bar.price()).powi(2)).exp();
            bar.add_volume((factor - 1.0) * bar.volume());
        }
        Ok(())
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Book {
    /// Two-row rendering: one row of prices, one row of volumes with bid
    /// volumes negated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut price_row = String::from("price\t");
        let mut volume_row = String::from("volume\t");
        for bar in &self.bids {
            price_row.push_str(&format!("{:.1}\t", bar.price()));
            volume_row.push_str(&format!("{:.1}\t", -bar.volume()));
        }
        for bar in &self.asks {
            price_row.push_str(&format!("{:.1}\t", bar.price()));
            volume_row.push_str(&format!("{:.1}\t", bar.volume()));
        }
        let title = " current limit order book ";
        let width = price_row.len().max(volume_row.len());
        let left = width.saturating_sub(title.len()) / 2;
        let right = width.saturating_sub(left + title.len());
        writeln!(f, "{}{}{}", "=".repeat(left), title, "=".repeat(right))?;
        writeln!(f, "{price_row}")?;
        write!(f, "{volume_row}")
    }
}
