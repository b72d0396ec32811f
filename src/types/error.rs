//! Error types for the market simulator.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result type alias for simulator operations.
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Main error type for the market simulator.
///
/// The taxonomy is deliberately small: every fallible operation in the crate
/// maps its failure onto one of these four kinds. Only [`SimError::LiquidityCrisis`]
/// is ever recovered, and only at the path-engine boundary where it marks the
/// path as failed; everything else propagates to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "details"))]
pub enum SimError {
    /// Bad sign, size, enum value, probability, or tick handed to an operation.
    ///
    /// Raised at the boundary of the operation that received the argument and
    /// never recovered internally.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not valid in the current state.
    ///
    /// Raised on tick-size re-configuration and on a limit-order insert that
    /// would cross the book (crossing limits must go through
    /// `Book::absorb_limit_order` instead).
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Option math requested for a contract kind that is not implemented.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A book read or mutation ran while safety checks were active and one
    /// side of the book was empty.
    ///
    /// The path engine turns this into a failed path; a one-sided book is the
    /// simulator's notion of market failure.
    #[error("one side of the book is empty while safety checks are active")]
    LiquidityCrisis,
}

impl SimError {
    /// Returns true if this error reports a bad argument.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true if this error reports an operation in an illegal state.
    #[must_use]
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState(_))
    }

    /// Returns true if this error reports unimplemented option math.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Returns true if this error reports a one-sided book under safety checks.
    #[must_use]
    pub fn is_liquidity_crisis(&self) -> bool {
        matches!(self, Self::LiquidityCrisis)
    }
}

#[cfg(test)]
mod tests {
    use super::{SimError, SimResult};

    #[test]
    fn test_error_display() {
        let err = SimError::InvalidArgument("negative volume".to_string());
        assert_eq!(err.to_string(), "invalid argument: negative volume");

        let err = SimError::IllegalState("tick size already set".to_string());
        assert_eq!(err.to_string(), "illegal state: tick size already set");

        assert!(SimError::LiquidityCrisis.to_string().contains("one side"));
    }

    #[test]
    fn test_error_kind_predicates() {
        let arg_err = SimError::InvalidArgument("bad sign".to_string());
        assert!(arg_err.is_invalid_argument());
        assert!(!arg_err.is_illegal_state());
        assert!(!arg_err.is_liquidity_crisis());

        let state_err = SimError::IllegalState("crossing insert".to_string());
        assert!(state_err.is_illegal_state());
        assert!(!state_err.is_unsupported());

        let opt_err = SimError::Unsupported("CALL".to_string());
        assert!(opt_err.is_unsupported());

        assert!(SimError::LiquidityCrisis.is_liquidity_crisis());
    }

    #[test]
    fn test_result_alias() {
        fn fails() -> SimResult<f64> {
            Err(SimError::LiquidityCrisis)
        }
        assert!(fails().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_error_serialization() {
        let err = SimError::InvalidArgument("negative tick".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains(r#""type":"InvalidArgument"#));

        let back: SimError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
