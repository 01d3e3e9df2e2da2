//! Core domain types for the backtester
//!
//! Prices and volumes are integer ticks (`i64`) throughout; only the
//! precomputed mid price and the running profit/loss are floats, matching
//! the historical data files.

use serde::Serialize;

/// Product identifier, e.g. `"KELP"`.
pub type Symbol = String;

/// Simulation time in the historical data's units.
pub type Timestamp = i64;

/// Party id used for the strategy's own side of an executed trade.
pub const SUBMISSION: &str = "SUBMISSION";

/// An order returned by the strategy for one timestamp.
///
/// Quantity is signed: positive buys, negative sells. Orders are pure
/// takers with immediate-or-cancel semantics at timestamp granularity;
/// any unfilled remainder is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub symbol: Symbol,
    pub price: i64,
    pub quantity: i64,
}

impl Order {
    pub fn new(symbol: impl Into<Symbol>, price: i64, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
        }
    }

    #[inline]
    pub fn is_buy(&self) -> bool {
        self.quantity > 0
    }

    #[inline]
    pub fn is_sell(&self) -> bool {
        self.quantity < 0
    }
}

/// A trade: either a recorded historical market trade or an execution
/// produced by the matching engine (`buyer`/`seller` = [`SUBMISSION`]).
///
/// Historical trades are immutable once loaded; buyer and seller may be
/// blank in anonymized data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: i64,
    pub quantity: i64,
    pub buyer: String,
    pub seller: String,
    pub timestamp: Timestamp,
}

impl Trade {
    pub fn new(
        symbol: impl Into<Symbol>,
        price: i64,
        quantity: i64,
        buyer: impl Into<String>,
        seller: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
            buyer: buyer.into(),
            seller: seller.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_sides() {
        let buy = Order::new("KELP", 2028, 5);
        let sell = Order::new("KELP", 2030, -5);
        let flat = Order::new("KELP", 2029, 0);

        assert!(buy.is_buy() && !buy.is_sell());
        assert!(sell.is_sell() && !sell.is_buy());
        assert!(!flat.is_buy() && !flat.is_sell());
    }

    #[test]
    fn test_trade_construction() {
        let trade = Trade::new("KELP", 2028, 3, SUBMISSION, "", 1000);
        assert_eq!(trade.buyer, "SUBMISSION");
        assert_eq!(trade.seller, "");
        assert_eq!(trade.timestamp, 1000);
    }
}
