//! Order depth for one product at one timestamp
//!
//! Bids map price → positive resting volume; asks map price → negative
//! resting volume (negative means resting sell size). That sign convention
//! is part of the strategy-visible state, but it is a source of subtle
//! bugs inside the engine, so all matching code goes through the
//! always-positive accessors instead of inlining sign flips.
//!
//! A depth is rebuilt fresh from the snapshot every timestamp and mutated
//! in place as matching consumes liquidity.

use std::collections::BTreeMap;

use crate::data::types::PriceRow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDepth {
    buy_orders: BTreeMap<i64, i64>,
    sell_orders: BTreeMap<i64, i64>,
}

impl OrderDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a depth from a snapshot row, inserting every level the row
    /// carries. Absent levels are simply omitted.
    pub fn from_price_row(row: &PriceRow) -> Self {
        let mut depth = Self::new();
        for (price, volume) in row.bid_levels() {
            depth.insert_bid_level(price, volume);
        }
        for (price, volume) in row.ask_levels() {
            depth.insert_ask_level(price, volume);
        }
        depth
    }

    /// Insert a bid level; `volume` is the positive size from the data.
    pub fn insert_bid_level(&mut self, price: i64, volume: i64) {
        self.buy_orders.insert(price, volume);
    }

    /// Insert an ask level; `volume` is the positive size from the data,
    /// stored negated per the sign convention.
    pub fn insert_ask_level(&mut self, price: i64, volume: i64) {
        self.sell_orders.insert(price, -volume);
    }

    /// Strategy-visible bid side: price → positive volume.
    pub fn buy_orders(&self) -> &BTreeMap<i64, i64> {
        &self.buy_orders
    }

    /// Strategy-visible ask side: price → negative volume.
    pub fn sell_orders(&self) -> &BTreeMap<i64, i64> {
        &self.sell_orders
    }

    /// Best (highest) bid as (price, positive volume).
    pub fn best_bid(&self) -> Option<(i64, i64)> {
        self.buy_orders
            .iter()
            .next_back()
            .map(|(&price, &volume)| (price, volume))
    }

    /// Best (lowest) ask as (price, positive volume).
    pub fn best_ask(&self) -> Option<(i64, i64)> {
        self.sell_orders
            .iter()
            .next()
            .map(|(&price, &volume)| (price, volume.abs()))
    }

    /// Resting bid volume at a price, always positive; zero if absent.
    pub fn bid_volume_at(&self, price: i64) -> i64 {
        self.buy_orders.get(&price).copied().unwrap_or(0)
    }

    /// Resting ask volume at a price, always positive; zero if absent.
    pub fn ask_volume_at(&self, price: i64) -> i64 {
        self.sell_orders.get(&price).copied().unwrap_or(0).abs()
    }

    /// Ask prices a buy order at `limit` can cross, ascending (best first).
    pub fn crossable_asks(&self, limit: i64) -> Vec<i64> {
        self.sell_orders
            .range(..=limit)
            .map(|(&price, _)| price)
            .collect()
    }

    /// Bid prices a sell order at `limit` can cross, descending (best first).
    pub fn crossable_bids(&self, limit: i64) -> Vec<i64> {
        self.buy_orders
            .range(limit..)
            .rev()
            .map(|(&price, _)| price)
            .collect()
    }

    /// Consume `volume` of resting ask liquidity at a price, removing the
    /// level when it reaches zero. Callers never consume more than rests.
    pub fn consume_ask(&mut self, price: i64, volume: i64) {
        if let Some(resting) = self.sell_orders.get_mut(&price) {
            *resting += volume;
            if *resting == 0 {
                self.sell_orders.remove(&price);
            }
        }
    }

    /// Consume `volume` of resting bid liquidity at a price, removing the
    /// level when it reaches zero.
    pub fn consume_bid(&mut self, price: i64, volume: i64) {
        if let Some(resting) = self.buy_orders.get_mut(&price) {
            *resting -= volume;
            if *resting == 0 {
                self.buy_orders.remove(&price);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> OrderDepth {
        let mut depth = OrderDepth::new();
        depth.insert_bid_level(2028, 10);
        depth.insert_bid_level(2026, 5);
        depth.insert_ask_level(2030, 7);
        depth.insert_ask_level(2031, 3);
        depth
    }

    #[test]
    fn test_sign_convention() {
        let depth = two_by_two();

        assert_eq!(depth.buy_orders().get(&2028), Some(&10));
        assert_eq!(depth.sell_orders().get(&2030), Some(&-7));

        // Accessors never expose the sign
        assert_eq!(depth.bid_volume_at(2028), 10);
        assert_eq!(depth.ask_volume_at(2030), 7);
        assert_eq!(depth.ask_volume_at(2050), 0);
    }

    #[test]
    fn test_best_levels() {
        let depth = two_by_two();

        assert_eq!(depth.best_bid(), Some((2028, 10)));
        assert_eq!(depth.best_ask(), Some((2030, 7)));
        assert_eq!(OrderDepth::new().best_bid(), None);
    }

    #[test]
    fn test_crossable_asks_ascending() {
        let depth = two_by_two();

        assert_eq!(depth.crossable_asks(2031), vec![2030, 2031]);
        assert_eq!(depth.crossable_asks(2030), vec![2030]);
        assert!(depth.crossable_asks(2029).is_empty());
    }

    #[test]
    fn test_crossable_bids_descending() {
        let depth = two_by_two();

        assert_eq!(depth.crossable_bids(2026), vec![2028, 2026]);
        assert_eq!(depth.crossable_bids(2028), vec![2028]);
        assert!(depth.crossable_bids(2029).is_empty());
    }

    #[test]
    fn test_consume_removes_exhausted_level() {
        let mut depth = two_by_two();

        depth.consume_ask(2030, 5);
        assert_eq!(depth.ask_volume_at(2030), 2);

        depth.consume_ask(2030, 2);
        assert_eq!(depth.ask_volume_at(2030), 0);
        assert!(!depth.sell_orders().contains_key(&2030));

        depth.consume_bid(2028, 10);
        assert!(!depth.buy_orders().contains_key(&2028));
    }

    #[test]
    fn test_from_price_row_one_sided() {
        let row = PriceRow {
            day: 0,
            timestamp: 0,
            product: "KELP".to_string(),
            bid_prices: vec![],
            bid_volumes: vec![],
            ask_prices: vec![2030, 2031],
            ask_volumes: vec![7, 3],
            mid_price: 2030.5,
            profit_loss: 0.0,
        };

        let depth = OrderDepth::from_price_row(&row);
        assert!(depth.buy_orders().is_empty());
        assert_eq!(depth.sell_orders().len(), 2);
        assert_eq!(depth.ask_volume_at(2031), 3);
    }
}
