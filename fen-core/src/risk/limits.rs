//! Position limit enforcement
//!
//! Limits are checked on the *declared* order batch before matching, not on
//! post-trade reality: a batch that could legally breach the limit if fully
//! filled is rejected outright. The policy is all-or-nothing per product —
//! a strategy that asks for too much on one side loses its entire batch for
//! that product this tick, including the side that was within limits. The
//! asymmetric, unforgiving shape is deliberate: strategies are expected to
//! self-limit.

use std::collections::BTreeMap;

use tracing::warn;

use crate::core::{DataError, Order, Symbol};

/// Static configuration: product → position limit.
///
/// Every tradable product must have a limit; products absent from the
/// mapping are rejected at setup.
#[derive(Debug, Clone, Default)]
pub struct PositionLimits {
    limits: BTreeMap<Symbol, i64>,
}

impl PositionLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, product: impl Into<Symbol>, limit: i64) -> Self {
        self.limits.insert(product.into(), limit);
        self
    }

    pub fn insert(&mut self, product: impl Into<Symbol>, limit: i64) {
        self.limits.insert(product.into(), limit);
    }

    pub fn get(&self, product: &str) -> Option<i64> {
        self.limits.get(product).copied()
    }

    /// Setup-time check: every product of the day must have a limit.
    pub fn ensure_covers<'a>(
        &self,
        products: impl IntoIterator<Item = &'a Symbol>,
    ) -> Result<(), DataError> {
        for product in products {
            if !self.limits.contains_key(product) {
                return Err(DataError::MissingLimit(product.clone()));
            }
        }
        Ok(())
    }
}

impl FromIterator<(Symbol, i64)> for PositionLimits {
    fn from_iter<I: IntoIterator<Item = (Symbol, i64)>>(iter: I) -> Self {
        Self {
            limits: iter.into_iter().collect(),
        }
    }
}

/// Drop every product batch that could breach its limit, returning the
/// violation notes for the timestamp's sandbox log.
///
/// A batch is accepted iff `position + total_long <= limit` and
/// `position - total_short >= -limit`, where `total_long` sums the batch's
/// positive quantities and `total_short` the absolute negative ones.
pub fn enforce_limits(
    orders: &mut BTreeMap<Symbol, Vec<Order>>,
    position: &BTreeMap<Symbol, i64>,
    limits: &PositionLimits,
    products: &[Symbol],
) -> Vec<String> {
    let mut notes = Vec::new();

    for product in products {
        let Some(batch) = orders.get(product) else {
            continue;
        };
        let Some(limit) = limits.get(product) else {
            continue;
        };

        let current = position.get(product).copied().unwrap_or(0);
        let total_long: i64 = batch.iter().filter(|o| o.quantity > 0).map(|o| o.quantity).sum();
        let total_short: i64 = batch
            .iter()
            .filter(|o| o.quantity < 0)
            .map(|o| o.quantity.abs())
            .sum();

        if current + total_long > limit || current - total_short < -limit {
            warn!(
                product = product.as_str(),
                current, total_long, total_short, limit, "order batch exceeded position limit"
            );
            notes.push(format!(
                "Orders for product {product} exceeded limit of {limit} set"
            ));
            orders.remove(product);
        }
    }

    notes
}
