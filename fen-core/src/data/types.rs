//! Raw historical data rows.

use crate::core::{Symbol, Timestamp};

/// One order-book snapshot per (timestamp, product).
///
/// Levels are sorted best-first. Either side may present fewer than three
/// levels, or none at all; the vectors only hold the levels the data file
/// actually carries. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub day: i32,
    pub timestamp: Timestamp,
    pub product: Symbol,
    pub bid_prices: Vec<i64>,
    pub bid_volumes: Vec<i64>,
    pub ask_prices: Vec<i64>,
    pub ask_volumes: Vec<i64>,
    /// Precomputed reference price, used only for mark-to-market reporting.
    pub mid_price: f64,
    /// Precomputed baseline profit/loss column from the data file.
    pub profit_loss: f64,
}

impl PriceRow {
    /// Bid levels as (price, volume) pairs, best-first.
    pub fn bid_levels(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.bid_prices
            .iter()
            .copied()
            .zip(self.bid_volumes.iter().copied())
    }

    /// Ask levels as (price, volume) pairs, best-first.
    pub fn ask_levels(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.ask_prices
            .iter()
            .copied()
            .zip(self.ask_volumes.iter().copied())
    }
}
