//! The resident delta-gamma hedger.
//!
//! The hedger carries an option book (re-struck daily), a signed stock
//! inventory accumulated from its own fills, and at most one outstanding
//! quote in the market. Each quarter it inspects the tape to decide whether
//! its quote filled; if not, the path engine cancels the stale quote and the
//! hedger re-quotes on a schedule that walks from passive to marketable as
//! the hour ages. Portfolio greeks are refreshed hourly at the prevailing
//! mid.

use crate::book::{Book, PriceBar};
use crate::options::OptionLeg;
use crate::types::error::SimResult;
use crate::types::{OptionKind, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A quote the hedger wants in the market: anchor price, unsigned volume,
/// and side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HedgerQuote {
    /// Raw quote price (snapped once it reaches the book).
    pub price: f64,
    /// Unsigned quote volume.
    pub volume: f64,
    /// Sell when the portfolio is long delta, buy when short.
    pub side: Side,
}

/// Delta-gamma hedger state.
///
/// # Example
///
/// ```rust
/// use microhedger::book::Book;
/// use microhedger::hedger::Hedger;
///
/// let book = Book::with_levels(&[101.0], &[100.0], &[99.0], &[100.0]).unwrap();
/// let mut hedger = Hedger::new(80.0, 0.089);
/// hedger.reset_gamma_contract(0.0, &book).unwrap();
/// // freshly struck at the mid, the straddle is delta-neutral
/// assert!(hedger.delta().abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Hedger {
    option_position: f64,
    implied_volatility: f64,
    options: Vec<OptionLeg>,
    stocks: Vec<PriceBar>,
    outstanding_quote: PriceBar,
    delta: f64,
    gamma: f64,
}

impl Hedger {
    /// Creates a hedger with a fixed option position multiplier and implied
    /// volatility, holding nothing.
    #[must_use]
    pub fn new(option_position: f64, implied_volatility: f64) -> Self {
        Self {
            option_position,
            implied_volatility,
            options: Vec::new(),
            stocks: Vec::new(),
            outstanding_quote: PriceBar::empty(),
            delta: 0.0,
            gamma: 0.0,
        }
    }

    /// Cached portfolio delta from the last greek refresh.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Cached portfolio gamma from the last greek refresh.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Price of the outstanding quote.
    #[must_use]
    pub fn quote_price(&self) -> f64 {
        self.outstanding_quote.price()
    }

    /// Signed volume of the outstanding quote (positive sell, negative buy).
    #[must_use]
    pub fn quote_volume(&self) -> f64 {
        self.outstanding_quote.volume()
    }

    /// The outstanding quote as a bar; the empty bar means no quote.
    #[must_use]
    pub fn quote(&self) -> &PriceBar {
        &self.outstanding_quote
    }

    /// Signed stock fills accumulated today.
    #[must_use]
    pub fn stocks(&self) -> &[PriceBar] {
        &self.stocks
    }

    /// Option legs held today.
    #[must_use]
    pub fn options(&self) -> &[OptionLeg] {
        &self.options
    }

    /// Net signed stock position.
    #[must_use]
    pub fn net_stock_position(&self) -> f64 {
        self.stocks.iter().map(PriceBar::volume).sum()
    }

    /// Portfolio delta at the book's mid: option deltas plus the signed
    /// stock inventory.
    pub fn portfolio_delta(&self, vol: f64, book: &Book, time: f64) -> SimResult<f64> {
        let mut delta = self.net_stock_position();
        for leg in &self.options {
            delta += leg.delta(vol, book.mid(), time)?;
        }
        Ok(delta)
    }

    /// Portfolio gamma at the book's mid. Stock gamma is zero.
    pub fn portfolio_gamma(&self, vol: f64, book: &Book, time: f64) -> SimResult<f64> {
        let mut gamma = 0.0;
        for leg in &self.options {
            gamma += leg.gamma(vol, book.mid(), time)?;
        }
        Ok(gamma)
    }

    /// Starts a trading day: clears stocks, options, and the outstanding
    /// quote, opens one straddle struck at the current mid and maturing two
    /// days out, then refreshes the greeks.
    pub fn reset_gamma_contract(&mut self, time: f64, book: &Book) -> SimResult<()> {
        self.stocks.clear();
        self.options.clear();
        self.outstanding_quote = PriceBar::empty();
        let spot = book.mid();
        self.options.push(OptionLeg::new(
            OptionKind::Straddle,
            time,
            time + 2.0,
            spot,
            self.option_position,
        ));
        self.recalc_greeks(time, book)
    }

    /// Refreshes the cached delta and gamma at the book's current mid.
    pub fn recalc_greeks(&mut self, time: f64, book: &Book) -> SimResult<()> {
        self.delta = self.portfolio_delta(self.implied_volatility, book, time)?;
        self.gamma = self.portfolio_gamma(self.implied_volatility, book, time)?;
        Ok(())
    }

    /// Decides from the quarter's execution rounds whether the outstanding
    /// quote has been (cumulatively) filled.
    ///
    /// An execution matches when its price equals the quote price to machine
    /// epsilon and its signed volume has the quote's sign; matching volume is
    /// consumed until the quote's outstanding volume is exhausted. With no
    /// outstanding quote the answer is `false`; a quote whose volume is
    /// already zero counts as filled.
    #[must_use]
    pub fn is_own_quote_filled(&self, rounds: &[Vec<PriceBar>]) -> bool {
        if self.outstanding_quote.is_empty_bar() {
            return false;
        }
        let mut outstanding = self.outstanding_quote.volume();
        if outstanding.abs() < f64::EPSILON {
            return true;
        }
        for round in rounds {
            for report in round {
                let same_price =
                    (report.price() - self.outstanding_quote.price()).abs() < f64::EPSILON;
                let same_side = report.volume() * self.outstanding_quote.volume() > 0.0;
                if same_price && same_side {
                    let reported = report.volume();
                    let consumed = if reported > 0.0 {
                        reported.min(outstanding)
                    } else {
                        reported.max(outstanding)
                    };
                    outstanding -= consumed;
                    if outstanding.abs() < f64::EPSILON {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Produces the next quote, if one is warranted.
    ///
    /// No-op when the cached delta is negligible, or when an outstanding
    /// quote exists and the tape shows it filled. Otherwise the hedger sells
    /// when long delta and buys when short, quoting its full delta. The
    /// anchor is the touch on the quoting side, offset by one spread-sized
    /// step per bracket of the hour fraction `t_q`:
    ///
    /// - `t_q < 0.25`: one full spread beyond the own touch (passive)
    /// - `t_q < 0.5`: at the own touch
    /// - `t_q < 0.75`: half a spread inside the spread (improving)
    /// - otherwise: at the opposite touch (marketable)
    ///
    /// The produced quote is recorded as the new outstanding quote.
    pub fn post_order(
        &mut self,
        rounds: &[Vec<PriceBar>],
        book: &Book,
        t_q: f64,
    ) -> Option<HedgerQuote> {
        if self.delta.abs() < f64::EPSILON {
            return None;
        }
        let filled = self.is_own_quote_filled(rounds);
        if !self.outstanding_quote.is_empty_bar() && filled {
            return None;
        }
        let spread = book.spread();
        let side = if self.delta > 0.0 {
            Side::Sell
        } else {
            Side::Buy
        };
        let volume = self.delta.abs();
        let mut price = match side {
            Side::Sell => book.ask(),
            Side::Buy => book.bid(),
        };
        if t_q < 0.25 {
            price += side.sign() * spread;
        } else if t_q < 0.5 {
            // sit at the touch
        } else if t_q < 0.75 {
            price -= side.sign() * 0.5 * spread;
        } else {
            price -= side.sign() * spread;
        }
        self.outstanding_quote = PriceBar::new(price, side.sign() * volume);
        Some(HedgerQuote {
            price,
            volume,
            side,
        })
    }

    /// Books the outstanding quote into the stock inventory once the tape
    /// shows it filled.
    ///
    /// The stored fill negates the quote's signed volume, so a sell quote
    /// contributes a short stock position and a buy quote a long one. The
    /// quote's volume is then zeroed (price retained), returning the hedger
    /// to the idle state.
    pub fn update_inventory(&mut self, rounds: &[Vec<PriceBar>]) {
        let filled = self.is_own_quote_filled(rounds);
        if !self.outstanding_quote.is_empty_bar()
            && !self.outstanding_quote.is_empty_volume()
            && filled
        {
            self.stocks.push(PriceBar::new(
                self.outstanding_quote.price(),
                -self.outstanding_quote.volume(),
            ));
            self.outstanding_quote = PriceBar::new(self.outstanding_quote.price(), 0.0);
        }
    }
}
