//! Per-day market data store
//!
//! Indexes price rows by timestamp then product and historical trades by
//! timestamp then product, and exposes the day's sorted timestamps and
//! products. BTreeMap keys give the deterministic iteration order the
//! output log depends on.

use std::collections::BTreeMap;

use crate::core::{Symbol, Timestamp, Trade};
use crate::data::types::PriceRow;

/// One simulated day of immutable historical data.
#[derive(Debug, Clone)]
pub struct DayData {
    round: i32,
    day: i32,
    prices: BTreeMap<Timestamp, BTreeMap<Symbol, PriceRow>>,
    trades: BTreeMap<Timestamp, BTreeMap<Symbol, Vec<Trade>>>,
    products: Vec<Symbol>,
}

impl DayData {
    pub fn new(round: i32, day: i32, rows: Vec<PriceRow>, trades: Vec<Trade>) -> Self {
        let mut prices: BTreeMap<Timestamp, BTreeMap<Symbol, PriceRow>> = BTreeMap::new();
        let mut products: Vec<Symbol> = Vec::new();

        for row in rows {
            if !products.contains(&row.product) {
                products.push(row.product.clone());
            }
            prices
                .entry(row.timestamp)
                .or_default()
                .insert(row.product.clone(), row);
        }
        products.sort();

        let mut trades_index: BTreeMap<Timestamp, BTreeMap<Symbol, Vec<Trade>>> = BTreeMap::new();
        for trade in trades {
            trades_index
                .entry(trade.timestamp)
                .or_default()
                .entry(trade.symbol.clone())
                .or_default()
                .push(trade);
        }

        Self {
            round,
            day,
            prices,
            trades: trades_index,
            products,
        }
    }

    pub fn round(&self) -> i32 {
        self.round
    }

    pub fn day(&self) -> i32 {
        self.day
    }

    /// The snapshot for a (timestamp, product), if the data carries one.
    pub fn price(&self, timestamp: Timestamp, product: &str) -> Option<&PriceRow> {
        self.prices.get(&timestamp)?.get(product)
    }

    /// Historical trades recorded at a (timestamp, product), in file order.
    pub fn trades_at(&self, timestamp: Timestamp, product: &str) -> &[Trade] {
        self.trades
            .get(&timestamp)
            .and_then(|by_product| by_product.get(product))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Products that recorded trades at a timestamp, sorted.
    pub fn traded_products_at(&self, timestamp: Timestamp) -> Vec<&Symbol> {
        self.trades
            .get(&timestamp)
            .map(|by_product| by_product.keys().collect())
            .unwrap_or_default()
    }

    /// The day's distinct timestamps, ascending.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.prices.keys().copied().collect()
    }

    /// The day's distinct products, sorted.
    pub fn products(&self) -> &[Symbol] {
        &self.products
    }
}
