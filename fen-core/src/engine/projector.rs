//! State projection
//!
//! Before each strategy call the projector rebuilds the per-product order
//! depths from the timestamp's snapshot rows. Every product of the day
//! gets a depth, even one with no activity at this timestamp (it projects
//! as an empty book). Positions, own trades, and market trades already
//! live on the state and carry forward on their own schedules.

use crate::data::DayData;
use crate::orderbook::OrderDepth;
use crate::strategy::TradingState;

/// Populate `state.order_depths` for `state.timestamp` from the day's data.
pub fn project_state(state: &mut TradingState, data: &DayData) {
    for product in data.products() {
        let depth = match data.price(state.timestamp, product) {
            Some(row) => OrderDepth::from_price_row(row),
            None => OrderDepth::new(),
        };
        state.order_depths.insert(product.clone(), depth);
    }
}
