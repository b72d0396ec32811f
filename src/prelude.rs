//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types of the simulator. Import
//! everything you need with:
//!
//! ```rust
//! use microhedger::prelude::*;
//! ```

// Re-export error types and the tick-size configuration
pub use crate::types::error::{SimError, SimResult};
pub use crate::types::tick::{set_tick_size, tick_size, MIN_TICK_SIZE};

// Re-export common enumerations
pub use crate::types::{OptionKind, OrderKind, Parameter, Side};

// Re-export book types
pub use crate::book::{BarStatus, Book, MarketFill, PriceBar};

// Re-export option math
pub use crate::options::OptionLeg;

// Re-export the order-flow driver
pub use crate::flow::{OrderSpec, RandomDriver, RandomInfo};

// Re-export the hedger
pub use crate::hedger::{Hedger, HedgerQuote};

// Re-export the path engine
pub use crate::sim::{
    generate_scenarios, LiquidityMetrics, Path, PathCollection, PathInfo, PathStatus, SimConfig,
};
