//! Order matching engine
//!
//! Every submitted order is a pure taker matched in two phases: first
//! against the synthetic book (best price first, fills at the resting
//! level's price), then against remaining capacity in the timestamp's
//! historical trades (fills at the order's own price — the real
//! counterparty would have accepted, since the order was at least as
//! aggressive). Whatever quantity is left after both phases is dropped:
//! immediate-or-cancel at timestamp granularity.
//!
//! After all orders are matched, historical trades with unconsumed
//! capacity are re-synthesized as ordinary market trades for the next
//! timestamp's projected state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::core::{Order, Symbol, Trade, SUBMISSION};
use crate::data::DayData;
use crate::strategy::TradingState;

/// Policy for matching submitted orders against historical trade records
/// beyond the synthetic book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeMatchingMode {
    /// Also consume historical trades priced equal to the order.
    #[default]
    All,
    /// Only consume historical trades priced strictly worse than the order.
    Worse,
    /// Never consume historical trades.
    None,
}

impl FromStr for TradeMatchingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "worse" => Ok(Self::Worse),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown trade matching mode {other:?} (expected all, worse, or none)"
            )),
        }
    }
}

impl fmt::Display for TradeMatchingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Worse => write!(f, "worse"),
            Self::None => write!(f, "none"),
        }
    }
}

/// A historical trade's remaining matchable capacity at one timestamp.
///
/// Both sides start at the recorded quantity and are decremented as the
/// strategy's orders consume them; neither goes negative.
#[derive(Debug, Clone)]
pub struct OpenTrade {
    pub trade: Trade,
    pub buy_quantity: i64,
    pub sell_quantity: i64,
}

impl OpenTrade {
    pub fn new(trade: Trade) -> Self {
        let quantity = trade.quantity;
        Self {
            trade,
            buy_quantity: quantity,
            sell_quantity: quantity,
        }
    }

    /// The residual quantity this trade re-synthesizes to after matching.
    fn residual_quantity(&self) -> i64 {
        self.buy_quantity.min(self.sell_quantity)
    }
}

/// Match one order, mutating book, position, and profit/loss in place.
/// Returns the executed trades in fill order.
pub fn match_order(
    state: &mut TradingState,
    profit_loss: &mut BTreeMap<Symbol, f64>,
    order: &mut Order,
    open_trades: &mut [OpenTrade],
    mode: TradeMatchingMode,
) -> Vec<Trade> {
    if order.is_buy() {
        match_buy_order(state, profit_loss, order, open_trades, mode)
    } else if order.is_sell() {
        match_sell_order(state, profit_loss, order, open_trades, mode)
    } else {
        Vec::new()
    }
}

fn match_buy_order(
    state: &mut TradingState,
    profit_loss: &mut BTreeMap<Symbol, f64>,
    order: &mut Order,
    open_trades: &mut [OpenTrade],
    mode: TradeMatchingMode,
) -> Vec<Trade> {
    let mut trades = Vec::new();
    let timestamp = state.timestamp;

    // Phase 1: the synthetic book, best ask first, fills at the ask's price.
    if let Some(depth) = state.order_depths.get_mut(&order.symbol) {
        for price in depth.crossable_asks(order.price) {
            let volume = order.quantity.min(depth.ask_volume_at(price));

            trades.push(Trade::new(
                order.symbol.clone(),
                price,
                volume,
                SUBMISSION,
                "",
                timestamp,
            ));

            *state.position.entry(order.symbol.clone()).or_insert(0) += volume;
            *profit_loss.entry(order.symbol.clone()).or_insert(0.0) -= (price * volume) as f64;

            depth.consume_ask(price, volume);
            order.quantity -= volume;
            if order.quantity == 0 {
                return trades;
            }
        }
    }

    if mode == TradeMatchingMode::None {
        return trades;
    }

    // Phase 2: historical trades in recorded order, fills at the order's
    // own price. `worse` requires the order to be strictly more aggressive
    // than the real trade; `all` also permits equality.
    for open in open_trades.iter_mut() {
        if open.sell_quantity == 0
            || open.trade.price > order.price
            || (open.trade.price == order.price && mode == TradeMatchingMode::Worse)
        {
            continue;
        }

        let volume = order.quantity.min(open.sell_quantity);

        trades.push(Trade::new(
            order.symbol.clone(),
            order.price,
            volume,
            SUBMISSION,
            open.trade.seller.clone(),
            timestamp,
        ));

        *state.position.entry(order.symbol.clone()).or_insert(0) += volume;
        *profit_loss.entry(order.symbol.clone()).or_insert(0.0) -= (order.price * volume) as f64;

        open.sell_quantity -= volume;
        order.quantity -= volume;
        if order.quantity == 0 {
            return trades;
        }
    }

    trades
}

fn match_sell_order(
    state: &mut TradingState,
    profit_loss: &mut BTreeMap<Symbol, f64>,
    order: &mut Order,
    open_trades: &mut [OpenTrade],
    mode: TradeMatchingMode,
) -> Vec<Trade> {
    let mut trades = Vec::new();
    let timestamp = state.timestamp;

    // Phase 1: the synthetic book, best bid first, fills at the bid's price.
    if let Some(depth) = state.order_depths.get_mut(&order.symbol) {
        for price in depth.crossable_bids(order.price) {
            let volume = order.quantity.abs().min(depth.bid_volume_at(price));

            trades.push(Trade::new(
                order.symbol.clone(),
                price,
                volume,
                "",
                SUBMISSION,
                timestamp,
            ));

            *state.position.entry(order.symbol.clone()).or_insert(0) -= volume;
            *profit_loss.entry(order.symbol.clone()).or_insert(0.0) += (price * volume) as f64;

            depth.consume_bid(price, volume);
            order.quantity += volume;
            if order.quantity == 0 {
                return trades;
            }
        }
    }

    if mode == TradeMatchingMode::None {
        return trades;
    }

    for open in open_trades.iter_mut() {
        if open.buy_quantity == 0
            || open.trade.price < order.price
            || (open.trade.price == order.price && mode == TradeMatchingMode::Worse)
        {
            continue;
        }

        let volume = order.quantity.abs().min(open.buy_quantity);

        trades.push(Trade::new(
            order.symbol.clone(),
            order.price,
            volume,
            open.trade.buyer.clone(),
            SUBMISSION,
            timestamp,
        ));

        *state.position.entry(order.symbol.clone()).or_insert(0) -= volume;
        *profit_loss.entry(order.symbol.clone()).or_insert(0.0) += (order.price * volume) as f64;

        open.buy_quantity -= volume;
        order.quantity += volume;
        if order.quantity == 0 {
            return trades;
        }
    }

    trades
}

/// Match every order batch at the current timestamp and re-synthesize
/// residual market trades.
///
/// Executed trades and surviving residuals are appended to `trade_history`
/// in that order. `state.own_trades` is only replaced for products that
/// filled this timestamp; `state.market_trades` is replaced for every
/// product that recorded historical trades at this timestamp (possibly
/// with an empty list when everything was consumed).
pub fn match_orders(
    state: &mut TradingState,
    profit_loss: &mut BTreeMap<Symbol, f64>,
    data: &DayData,
    orders: &mut BTreeMap<Symbol, Vec<Order>>,
    mode: TradeMatchingMode,
    trade_history: &mut Vec<Trade>,
) {
    let timestamp = state.timestamp;

    let mut open_trades: BTreeMap<Symbol, Vec<OpenTrade>> = BTreeMap::new();
    for product in data.traded_products_at(timestamp) {
        open_trades.insert(
            product.clone(),
            data.trades_at(timestamp, product)
                .iter()
                .cloned()
                .map(OpenTrade::new)
                .collect(),
        );
    }

    for product in data.products() {
        let Some(mut batch) = orders.remove(product) else {
            continue;
        };

        let mut fills = Vec::new();
        let mut empty = Vec::new();
        let product_open_trades = open_trades.get_mut(product).unwrap_or(&mut empty);

        for order in batch.iter_mut() {
            fills.extend(match_order(
                state,
                profit_loss,
                order,
                product_open_trades,
                mode,
            ));
        }

        if !fills.is_empty() {
            trace!(
                product = product.as_str(),
                fills = fills.len(),
                "orders filled"
            );
            trade_history.extend(fills.iter().cloned());
            state.own_trades.insert(product.clone(), fills);
        }
    }

    for (product, opens) in open_trades {
        let remaining: Vec<Trade> = opens
            .into_iter()
            .filter_map(|open| {
                let quantity = open.residual_quantity();
                if quantity > 0 {
                    let mut trade = open.trade;
                    trade.quantity = quantity;
                    Some(trade)
                } else {
                    None
                }
            })
            .collect();

        trade_history.extend(remaining.iter().cloned());
        state.market_trades.insert(product, remaining);
    }
}
