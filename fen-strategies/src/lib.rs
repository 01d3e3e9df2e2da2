//! Fen Strategies - Example Backtest Strategies
//!
//! Reference strategies for driving the fen backtester. These are
//! deliberately simple; they exist to exercise the engine and to show the
//! strategy contract in use, not to make money.
//!
//! ## Available Strategies
//!
//! ### [`Idle`] - Do Nothing
//!
//! Submits no orders and echoes its persisted state back unchanged. A
//! backtest against `Idle` is the engine's identity check: every activity
//! row marks zero profit and the trade history contains only residual
//! market trades.
//!
//! ### [`FairValue`] - Anchored Value Taker
//!
//! Buys everything offered below a per-product fair value and sells into
//! every bid above it, capped per side so a full fill cannot breach the
//! position limit. The fair value is a fixed anchor when configured and a
//! rolling mean of observed mid prices otherwise, persisted between
//! timestamps through `trader_data`.

pub mod fair_value;
pub mod idle;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use fair_value::FairValue;
pub use idle::Idle;

use fen_core::Strategy;

/// Look up a strategy by its CLI name.
pub fn by_name(name: &str) -> Option<Box<dyn Strategy>> {
    match name {
        "idle" => Some(Box::new(Idle)),
        "fair-value" => Some(Box::new(FairValue::default())),
        _ => None,
    }
}
