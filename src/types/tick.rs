//! Process-wide tick-size configuration.
//!
//! Every price entering the simulator is snapped to the tick grid when a
//! [`PriceBar`](crate::book::PriceBar) is constructed. The tick is shared by
//! the whole process and is writable exactly once, before any market
//! activity; until it is set, snapping is the identity and prices compare at
//! machine-epsilon resolution.

use once_cell::sync::OnceCell;

use crate::types::error::{SimError, SimResult};

/// Default tick size: just above machine epsilon, so that snapping stays the
/// identity until a real tick is configured.
pub const MIN_TICK_SIZE: f64 = 2.0 * f64::EPSILON;

/// Rounding bias applied before snapping so that values sitting numerically a
/// hair below a grid point still round onto it.
const SNAP_BIAS: f64 = 1e-9;

static TICK_SIZE: OnceCell<f64> = OnceCell::new();

/// Returns the current tick size.
///
/// [`MIN_TICK_SIZE`] until [`set_tick_size`] has been called.
#[must_use]
pub fn tick_size() -> f64 {
    *TICK_SIZE.get().unwrap_or(&MIN_TICK_SIZE)
}

/// Configures the process-wide tick size.
///
/// # Errors
///
/// - [`SimError::IllegalState`] if the tick has already been configured.
/// - [`SimError::InvalidArgument`] if `ts` is not a positive number above
///   machine epsilon.
pub fn set_tick_size(ts: f64) -> SimResult<()> {
    if TICK_SIZE.get().is_some() {
        return Err(SimError::IllegalState(
            "tick size cannot be set again as it has already been configured".to_string(),
        ));
    }
    if !(ts > f64::EPSILON) {
        return Err(SimError::InvalidArgument(
            "tick size must be a positive number above machine epsilon".to_string(),
        ));
    }
    TICK_SIZE.set(ts).map_err(|_| {
        SimError::IllegalState(
            "tick size cannot be set again as it has already been configured".to_string(),
        )
    })
}

/// Snaps a raw price onto the tick grid.
///
/// Identity while the tick is at its default resolution.
#[must_use]
pub fn snap_to_grid(price: f64) -> f64 {
    let tick = tick_size();
    if tick <= MIN_TICK_SIZE {
        price
    } else {
        (price / tick + SNAP_BIAS).round() * tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The write-once global is exercised end to end in tests/tick_config.rs,
    // which runs in its own process. Unit tests here only touch behavior that
    // holds while the tick is at its default resolution.

    #[test]
    fn test_default_tick_is_minimal() {
        assert!(tick_size() >= MIN_TICK_SIZE);
    }

    #[test]
    fn test_snap_is_identity_at_default_resolution() {
        if tick_size() <= MIN_TICK_SIZE {
            assert_eq!(snap_to_grid(101.37), 101.37);
            assert_eq!(snap_to_grid(-2.5), -2.5);
            assert_eq!(snap_to_grid(0.0), 0.0);
        }
    }

    #[test]
    fn test_rejects_non_positive_tick() {
        assert!(set_tick_size(0.0).is_err());
        assert!(set_tick_size(-0.01).is_err());
        assert!(set_tick_size(f64::NAN).is_err());
    }
}
