//! The simulation engine
//!
//! - `projector`: rebuilds the strategy-visible state each timestamp
//! - `matching`: the order matching engine and historical-trade fallback
//! - `driver`: the per-day event loop

pub mod driver;
pub mod matching;
pub mod projector;

pub use driver::run_day;
pub use matching::{match_order, match_orders, OpenTrade, TradeMatchingMode};
pub use projector::project_state;
