//! The per-day event loop
//!
//! One day is one deterministic, single-threaded replay: for every
//! timestamp in the day's data the driver projects the strategy-visible
//! state, invokes the strategy, enforces position limits on the returned
//! batches, matches what survives, and records the timestamp's log rows.
//! Identical inputs produce byte-identical results.
//!
//! Strategy faults are contained at the day level: a panic inside the
//! callback aborts this day with [`RunError::StrategyPanic`] and leaves
//! the process able to run other days.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info};

use crate::core::{RunError, Symbol, Trade};
use crate::data::DayData;
use crate::engine::matching::{match_orders, TradeMatchingMode};
use crate::engine::projector::project_state;
use crate::report::{ActivityLogRow, BacktestResult, SandboxLogRow, TradeRow};
use crate::risk::{enforce_limits, PositionLimits};
use crate::strategy::{SandboxLogger, Strategy, TradingState};

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Replay one day of data against `strategy`.
///
/// Fails up front when a product of the day has no configured limit, and
/// mid-day when the strategy panics. Limit violations are not errors: the
/// offending batches are dropped and noted in the sandbox log.
pub fn run_day<S: Strategy + ?Sized>(
    strategy: &mut S,
    data: &DayData,
    limits: &PositionLimits,
    mode: TradeMatchingMode,
) -> Result<BacktestResult, RunError> {
    limits.ensure_covers(data.products())?;

    info!(
        round = data.round(),
        day = data.day(),
        strategy = strategy.name(),
        %mode,
        "running day"
    );

    let mut result = BacktestResult::new(data.round(), data.day());
    let mut state = TradingState::new();
    let mut profit_loss: BTreeMap<Symbol, f64> = BTreeMap::new();
    let mut day_trades: Vec<Trade> = Vec::new();

    for timestamp in data.timestamps() {
        state.timestamp = timestamp;
        project_state(&mut state, data);

        let mut logger = SandboxLogger::new();
        let output = panic::catch_unwind(AssertUnwindSafe(|| strategy.run(&state, &mut logger)))
            .map_err(|payload| RunError::StrategyPanic {
                timestamp,
                message: panic_message(payload.as_ref()),
            })?;

        state.trader_data = output.trader_data;
        let mut orders = output.orders;

        let notes = enforce_limits(&mut orders, &state.position, limits, data.products());
        let sandbox_log: String = notes.iter().map(|note| format!("\n{note}")).collect();

        match_orders(
            &mut state,
            &mut profit_loss,
            data,
            &mut orders,
            mode,
            &mut day_trades,
        );

        for product in data.products() {
            let Some(row) = data.price(timestamp, product) else {
                continue;
            };
            let mut pnl = profit_loss.get(product).copied().unwrap_or(0.0);
            let position = state.position_of(product);
            if position != 0 {
                pnl += position as f64 * row.mid_price;
            }
            result
                .activity_logs
                .push(ActivityLogRow::from_row(data.day(), row, pnl));
        }

        result.sandbox_logs.push(SandboxLogRow {
            sandbox_log,
            lambda_log: logger.into_log(),
            timestamp,
        });
    }

    debug!(
        round = data.round(),
        day = data.day(),
        trades = day_trades.len(),
        "day finished"
    );

    result.trades = day_trades.into_iter().map(TradeRow).collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Order;
    use crate::data::PriceRow;
    use crate::strategy::StrategyOutput;

    fn row(timestamp: i64, product: &str, bid: i64, ask: i64) -> PriceRow {
        PriceRow {
            day: 0,
            timestamp,
            product: product.to_string(),
            bid_prices: vec![bid],
            bid_volumes: vec![10],
            ask_prices: vec![ask],
            ask_volumes: vec![10],
            mid_price: (bid + ask) as f64 / 2.0,
            profit_loss: 0.0,
        }
    }

    fn day() -> DayData {
        DayData::new(
            1,
            0,
            vec![row(0, "KELP", 99, 101), row(100, "KELP", 99, 101)],
            vec![],
        )
    }

    fn limits() -> PositionLimits {
        PositionLimits::new().with("KELP", 50)
    }

    struct Scripted<F>(F);

    impl<F: FnMut(&TradingState, &mut SandboxLogger) -> StrategyOutput> Strategy for Scripted<F> {
        fn run(&mut self, state: &TradingState, log: &mut SandboxLogger) -> StrategyOutput {
            (self.0)(state, log)
        }
    }

    #[test]
    fn test_idle_strategy_marks_zero_profit() {
        let mut idle = Scripted(|_: &TradingState, _: &mut SandboxLogger| StrategyOutput::default());

        let result = run_day(&mut idle, &day(), &limits(), TradeMatchingMode::All).unwrap();

        assert_eq!(result.activity_logs.len(), 2);
        assert!(result.activity_logs.iter().all(|r| r.profit_loss == 0.0));
        assert!(result.trades.is_empty());
    }

    #[test]
    fn test_fill_marks_to_market() {
        let mut buyer = Scripted(|state: &TradingState, _: &mut SandboxLogger| {
            let mut output = StrategyOutput::default();
            if state.timestamp == 0 {
                output
                    .orders
                    .insert("KELP".to_string(), vec![Order::new("KELP", 101, 5)]);
            }
            output
        });

        let result = run_day(&mut buyer, &day(), &limits(), TradeMatchingMode::All).unwrap();

        // Bought 5 at 101, mid is 100: -505 + 5*100 = -5 at both timestamps.
        assert_eq!(result.activity_logs[0].profit_loss, -5.0);
        assert_eq!(result.activity_logs[1].profit_loss, -5.0);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].0.quantity, 5);
    }

    #[test]
    fn test_limit_violation_noted_not_fatal() {
        let mut greedy = Scripted(|_: &TradingState, _: &mut SandboxLogger| {
            let mut output = StrategyOutput::default();
            output
                .orders
                .insert("KELP".to_string(), vec![Order::new("KELP", 101, 60)]);
            output
        });

        let result = run_day(&mut greedy, &day(), &limits(), TradeMatchingMode::All).unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(
            result.sandbox_logs[0].sandbox_log,
            "\nOrders for product KELP exceeded limit of 50 set"
        );
    }

    #[test]
    fn test_trader_data_round_trips() {
        let mut counter = Scripted(|state: &TradingState, log: &mut SandboxLogger| {
            let previous: i64 = state.trader_data.parse().unwrap_or(0);
            log.logf(format_args!("count {previous}"));
            StrategyOutput {
                trader_data: (previous + 1).to_string(),
                ..StrategyOutput::default()
            }
        });

        let result = run_day(&mut counter, &day(), &limits(), TradeMatchingMode::All).unwrap();

        assert_eq!(result.sandbox_logs[0].lambda_log, "count 0");
        assert_eq!(result.sandbox_logs[1].lambda_log, "count 1");
    }

    #[test]
    fn test_strategy_panic_becomes_error() {
        let mut broken = Scripted(|state: &TradingState, _: &mut SandboxLogger| {
            if state.timestamp == 100 {
                panic!("boom at {}", state.timestamp);
            }
            StrategyOutput::default()
        });

        let err = run_day(&mut broken, &day(), &limits(), TradeMatchingMode::All).unwrap_err();
        match err {
            RunError::StrategyPanic { timestamp, message } => {
                assert_eq!(timestamp, 100);
                assert_eq!(message, "boom at 100");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_limit_rejected_up_front() {
        let mut idle = Scripted(|_: &TradingState, _: &mut SandboxLogger| StrategyOutput::default());

        let err = run_day(&mut idle, &day(), &PositionLimits::new(), TradeMatchingMode::All)
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::Data(crate::core::DataError::MissingLimit(_))
        ));
    }
}
