//! Anchored fair-value taker
//!
//! For each product the strategy holds a notion of fair value and takes
//! any resting liquidity priced on the wrong side of it: asks strictly
//! below fair value are bought, bids strictly above it are sold. Take
//! sizes are capped per side so that even a complete fill stays inside
//! `max_position`.
//!
//! Fair value is a fixed anchor when one is configured for the product.
//! Otherwise it is the mean of a rolling window of observed mid prices,
//! carried between timestamps as JSON in `trader_data`; the strategy stays
//! flat on such products until the window has filled once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use fen_core::{Order, OrderDepth, SandboxLogger, Strategy, StrategyOutput, Symbol, TradingState};

const MID_WINDOW: usize = 10;

/// Rolling state persisted through `trader_data`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Memory {
    mids: BTreeMap<Symbol, Vec<f64>>,
}

impl Memory {
    fn observe(&mut self, product: &str, depth: &OrderDepth) {
        let (Some((bid, _)), Some((ask, _))) = (depth.best_bid(), depth.best_ask()) else {
            return;
        };
        let mids = self.mids.entry(product.to_string()).or_default();
        mids.push((bid + ask) as f64 / 2.0);
        if mids.len() > MID_WINDOW {
            mids.remove(0);
        }
    }

    fn rolling_value(&self, product: &str) -> Option<i64> {
        let mids = self.mids.get(product)?;
        if mids.len() < MID_WINDOW {
            return None;
        }
        let mean = mids.iter().sum::<f64>() / mids.len() as f64;
        Some(mean.round() as i64)
    }
}

#[derive(Debug, Clone)]
pub struct FairValue {
    anchors: BTreeMap<Symbol, i64>,
    max_position: i64,
}

impl Default for FairValue {
    fn default() -> Self {
        Self::new(20)
    }
}

impl FairValue {
    pub fn new(max_position: i64) -> Self {
        Self {
            anchors: BTreeMap::new(),
            max_position,
        }
    }

    /// Pin `product`'s fair value instead of deriving it from mid history.
    pub fn with_anchor(mut self, product: impl Into<Symbol>, value: i64) -> Self {
        self.anchors.insert(product.into(), value);
        self
    }

    fn fair_value(&self, memory: &Memory, product: &str) -> Option<i64> {
        self.anchors
            .get(product)
            .copied()
            .or_else(|| memory.rolling_value(product))
    }
}

impl Strategy for FairValue {
    fn run(&mut self, state: &TradingState, log: &mut SandboxLogger) -> StrategyOutput {
        let mut memory: Memory = serde_json::from_str(&state.trader_data).unwrap_or_default();
        let mut output = StrategyOutput::default();

        for (product, depth) in &state.order_depths {
            memory.observe(product, depth);

            let Some(value) = self.fair_value(&memory, product) else {
                trace!(product = product.as_str(), "no fair value yet, staying flat");
                continue;
            };

            let position = state.position_of(product);
            let mut to_buy = self.max_position - position;
            let mut to_sell = self.max_position + position;
            let mut batch = Vec::new();

            for (&price, &volume) in depth.sell_orders() {
                if price >= value || to_buy == 0 {
                    break;
                }
                let take = to_buy.min(volume.abs());
                log.logf(format_args!("BUY {take}x {price}"));
                batch.push(Order::new(product.clone(), price, take));
                to_buy -= take;
            }

            for (&price, &volume) in depth.buy_orders().iter().rev() {
                if price <= value || to_sell == 0 {
                    break;
                }
                let take = to_sell.min(volume);
                log.logf(format_args!("SELL {take}x {price}"));
                batch.push(Order::new(product.clone(), price, -take));
                to_sell -= take;
            }

            if !batch.is_empty() {
                output.orders.insert(product.clone(), batch);
            }
        }

        output.trader_data = serde_json::to_string(&memory).unwrap_or_default();
        output
    }

    fn name(&self) -> &'static str {
        "fair-value"
    }
}
