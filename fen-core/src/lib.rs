//! Fen Core - Discrete-Event Limit-Order-Book Backtester
//!
//! Fen replays a day of historical order-book snapshots and trade records
//! against a user-supplied strategy and measures the resulting profit/loss.
//! One simulated day is one deterministic, single-threaded pass over sorted
//! timestamps: position and profit/loss carry forward within the day and
//! nothing survives across day boundaries.
//!
//! ## Per-timestamp pipeline
//! ```text
//! DayData → projection → strategy callback → limit enforcement → matching → activity log
//! ```
//!
//! ## Core Modules
//! - `core`: domain types (`Order`, `Trade`) and the error taxonomy
//! - `data`: historical data loading and the per-day market data store
//! - `orderbook`: the synthetic per-timestamp order depth
//! - `risk`: static position limits and batch enforcement
//! - `strategy`: the strategy trait boundary and projected `TradingState`
//! - `engine`: state projection, order matching, and the day driver
//! - `report`: log rows, day results, merging, and output writing

pub mod core;
pub mod data;
pub mod engine;
pub mod orderbook;
pub mod report;
pub mod risk;
pub mod strategy;
pub mod utils;

// Re-export the types most callers need
pub use crate::core::{DataError, Order, RunError, Symbol, Timestamp, Trade, SUBMISSION};
pub use data::{DayData, PriceRow};
pub use engine::{run_day, TradeMatchingMode};
pub use orderbook::OrderDepth;
pub use report::{BacktestResult, CURRENCY};
pub use risk::PositionLimits;
pub use strategy::{SandboxLogger, Strategy, StrategyOutput, TradingState};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::{DataError, Order, RunError, Symbol, Timestamp, Trade, SUBMISSION};
    pub use crate::data::{DayData, PriceRow};
    pub use crate::engine::{run_day, TradeMatchingMode};
    pub use crate::orderbook::OrderDepth;
    pub use crate::report::{BacktestResult, CURRENCY};
    pub use crate::risk::PositionLimits;
    pub use crate::strategy::{SandboxLogger, Strategy, StrategyOutput, TradingState};
}
