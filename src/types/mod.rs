//! Common types shared across the simulator.
//!
//! This module contains:
//! - The [`Side`] of an order or ladder (ask/sell vs. bid/buy)
//! - The [`OrderKind`] and [`OptionKind`] enumerations
//! - The [`Parameter`] set used for scenario fan-out
//! - Error types ([`error`]) and the tick-size configuration ([`tick`])

pub mod error;
pub mod tick;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side of the market an order or a ladder belongs to.
///
/// Throughout the simulator the two sides carry the numeric signs of the
/// classic convention: `Sell` (the ask side) is `+1`, `Buy` (the bid side)
/// is `-1`. Execution reports encode the side in the sign of their volume.
///
/// # Example
///
/// ```rust
/// use microhedger::types::Side;
///
/// assert_eq!(Side::Sell.sign(), 1.0);
/// assert_eq!(Side::Buy.sign(), -1.0);
/// assert_eq!(Side::Sell.opposite(), Side::Buy);
/// assert_eq!(Side::from_sign(-3.5), Some(Side::Buy));
/// assert_eq!(Side::from_sign(0.0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// The ask side; resting sell orders. Numeric sign `+1`.
    Sell,
    /// The bid side; resting buy orders. Numeric sign `-1`.
    Buy,
}

impl Side {
    /// Numeric sign of this side: `+1.0` for sells, `-1.0` for buys.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Sell => 1.0,
            Self::Buy => -1.0,
        }
    }

    /// The other side of the market.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Sell => Self::Buy,
            Self::Buy => Self::Sell,
        }
    }

    /// Classifies a signed quantity. Exactly zero has no side.
    #[must_use]
    pub fn from_sign(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(Self::Sell)
        } else if value < 0.0 {
            Some(Self::Buy)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sell => write!(f, "sell"),
            Self::Buy => write!(f, "buy"),
        }
    }
}

/// Kind of an incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderKind {
    /// Resting order at a specified price; may cross if mispriced.
    Limit,
    /// Immediate execution against resting orders; carries no price.
    Market,
}

/// Kind of an option contract.
///
/// Only [`OptionKind::Straddle`] is implemented; greek computations for the
/// other kinds fail with [`error::SimError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionKind {
    /// European call. Not implemented.
    Call,
    /// European put. Not implemented.
    Put,
    /// Straddle under a normal-diffusion spot model.
    Straddle,
    /// Placeholder for an unrecognized contract.
    Invalid,
}

/// Parameters that can be swept when fanning a configuration template out
/// into scenarios.
///
/// `IniLobVolume` and `IniLobDecay` are reserved and currently rejected by
/// [`generate_scenarios`](crate::sim::generate_scenarios).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parameter {
    /// Number of trading days per path.
    NDays,
    /// Number of hours per day.
    NHours,
    /// Number of quarters per hour.
    NQuarters,
    /// Initial fundamental price.
    IniFundamental,
    /// Hedger's option position multiplier.
    HedgerOptionPosition,
    /// Hedger's implied volatility.
    HedgerImpliedVolatility,
    /// Base seed of the random driver.
    RandomSeed,
    /// Standard deviation of fundamental news shocks.
    VolatilityFundamental,
    /// Poisson intensity of order arrival.
    OrderIntensity,
    /// Probability that an exogenous order is a limit order.
    ProbLimitOrder,
    /// Probability that an exogenous order is informed.
    ProbInformed,
    /// Probability parameter of the order-sign draw.
    ProbBuy,
    /// Lower bound of the uniform order volume.
    VolumeMin,
    /// Upper bound of the uniform order volume.
    VolumeMax,
    /// Mean of the limit-order placement spread.
    SpreadMean,
    /// Standard deviation of the limit-order placement spread.
    SpreadVolatility,
    /// Reserved: initial book volume. Not implemented.
    IniLobVolume,
    /// Reserved: initial book decay coefficient. Not implemented.
    IniLobDecay,
}
