//! Option legs and their greeks under a normal-diffusion spot model.
//!
//! The hedger holds [`OptionLeg`]s and aggregates their delta and gamma into
//! a portfolio exposure. Only straddles are implemented; the implied
//! volatility is quoted in price units (not log-returns), matching the
//! normal-diffusion dynamics of the simulated spot.

pub mod math;

use crate::types::error::{SimError, SimResult};
use crate::types::OptionKind;

use math::{normal_cdf, normal_pdf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single option position, immutable after construction.
///
/// `position` is a signed contract multiplier; delta and gamma scale linearly
/// in it.
///
/// # Example
///
/// ```rust
/// use microhedger::options::OptionLeg;
/// use microhedger::types::OptionKind;
///
/// let leg = OptionLeg::new(OptionKind::Straddle, 0.0, 2.0, 100.0, 10.0);
/// // at the money the straddle delta is zero
/// let delta = leg.delta(0.1, 100.0, 0.0).unwrap();
/// assert!(delta.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptionLeg {
    kind: OptionKind,
    t_inception: f64,
    t_maturity: f64,
    strike: f64,
    position: f64,
}

impl OptionLeg {
    /// Creates a leg of `kind` struck at `strike`, alive on
    /// `[t_inception, t_maturity]`, with a signed `position` multiplier.
    #[must_use]
    pub fn new(
        kind: OptionKind,
        t_inception: f64,
        t_maturity: f64,
        strike: f64,
        position: f64,
    ) -> Self {
        Self {
            kind,
            t_inception,
            t_maturity,
            strike,
            position,
        }
    }

    /// Contract kind.
    #[must_use]
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Inception time of the leg.
    #[must_use]
    pub fn t_inception(&self) -> f64 {
        self.t_inception
    }

    /// Maturity time of the leg.
    #[must_use]
    pub fn t_maturity(&self) -> f64 {
        self.t_maturity
    }

    /// Strike price.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Signed position multiplier.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    fn moneyness(&self, vol: f64, spot: f64, t: f64) -> f64 {
        (spot - self.strike) / (vol * (self.t_maturity - t).sqrt())
    }

    /// Position-scaled delta at `spot` and time `t` with implied volatility
    /// `vol` in price units.
    ///
    /// # Errors
    ///
    /// [`SimError::Unsupported`] for any kind other than
    /// [`OptionKind::Straddle`].
    pub fn delta(&self, vol: f64, spot: f64, t: f64) -> SimResult<f64> {
        match self.kind {
            OptionKind::Straddle => {
                let d = self.moneyness(vol, spot, t);
                Ok(self.position * (2.0 * normal_cdf(d) - 1.0))
            }
            other => Err(SimError::Unsupported(format!(
                "greeks for option kind {other:?} are not implemented"
            ))),
        }
    }

    /// Position-scaled gamma at `spot` and time `t` with implied volatility
    /// `vol` in price units.
    ///
    /// Note the `spot - strike` factor below: this gamma vanishes at the
    /// money rather than peaking there the way the textbook normal-model
    /// gamma `2 φ(d) / (σ √τ)` does. The expression is part of the
    /// simulator's locked numerical behavior and is exposed as written.
    ///
    /// # Errors
    ///
    /// [`SimError::Unsupported`] for any kind other than
    /// [`OptionKind::Straddle`].
    pub fn gamma(&self, vol: f64, spot: f64, t: f64) -> SimResult<f64> {
        match self.kind {
            OptionKind::Straddle => {
                let inv_vol_sqrt_tau = 1.0 / (vol * (self.t_maturity - t).sqrt());
                let d = (spot - self.strike) * inv_vol_sqrt_tau;
                Ok(self.position * 2.0 * normal_pdf(d) * inv_vol_sqrt_tau / spot
                    * (spot - self.strike))
            }
            other => Err(SimError::Unsupported(format!(
                "greeks for option kind {other:?} are not implemented"
            ))),
        }
    }
}
