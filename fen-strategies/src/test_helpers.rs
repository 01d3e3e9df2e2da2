//! Test helpers for building strategy-visible states
//!
//! Strategy tests want a `TradingState` with a specific book shape without
//! repeating the depth-construction boilerplate everywhere.

use fen_core::{OrderDepth, TradingState};

/// State with one product whose book holds the given bid and ask levels.
pub fn state_with_book(product: &str, bids: &[(i64, i64)], asks: &[(i64, i64)]) -> TradingState {
    let mut depth = OrderDepth::new();
    for &(price, volume) in bids {
        depth.insert_bid_level(price, volume);
    }
    for &(price, volume) in asks {
        depth.insert_ask_level(price, volume);
    }

    let mut state = TradingState::new();
    state.order_depths.insert(product.to_string(), depth);
    state
}

/// Same as [`state_with_book`] with an existing position on the product.
pub fn state_with_position(
    product: &str,
    bids: &[(i64, i64)],
    asks: &[(i64, i64)],
    position: i64,
) -> TradingState {
    let mut state = state_with_book(product, bids, asks);
    state.position.insert(product.to_string(), position);
    state
}
