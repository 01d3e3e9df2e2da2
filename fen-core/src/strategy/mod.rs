//! The strategy trait boundary
//!
//! A strategy is arbitrary, untrusted code behind a single capability:
//! given the projected [`TradingState`], produce order batches, an opaque
//! conversion request, and a new persisted-state string. The engine
//! invokes it synchronously exactly once per timestamp; whatever the
//! strategy writes to its [`SandboxLogger`] is captured and attributed to
//! that timestamp in the output log.
//!
//! Strategies must not rely on hidden process-wide state across runs:
//! memory that should survive between timestamps goes through
//! `trader_data`, which the engine stores and hands back verbatim.

use std::collections::BTreeMap;
use std::fmt::Arguments;

use crate::core::{Order, Symbol, Timestamp, Trade};
use crate::orderbook::OrderDepth;

/// Side-channel observations, opaque to the core and passed through as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    pub plain_values: BTreeMap<Symbol, f64>,
}

/// The strategy-visible view of the market at one timestamp.
#[derive(Debug, Clone, Default)]
pub struct TradingState {
    pub timestamp: Timestamp,
    /// Opaque persisted-state string round-tripped from the previous call.
    pub trader_data: String,
    /// Synthetic book per product, rebuilt fresh every timestamp.
    pub order_depths: BTreeMap<Symbol, OrderDepth>,
    /// The strategy's own executions from the previous match step.
    pub own_trades: BTreeMap<Symbol, Vec<Trade>>,
    /// Residual market trades exposed from the previous timestamp.
    pub market_trades: BTreeMap<Symbol, Vec<Trade>>,
    /// Signed position per product, carried across the whole day.
    pub position: BTreeMap<Symbol, i64>,
    pub observations: Observations,
}

impl TradingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position for a product, zero when never traded.
    pub fn position_of(&self, product: &str) -> i64 {
        self.position.get(product).copied().unwrap_or(0)
    }
}

/// What a strategy returns for one timestamp.
#[derive(Debug, Clone, Default)]
pub struct StrategyOutput {
    /// Order batches keyed by product. One batch per product per timestamp.
    pub orders: BTreeMap<Symbol, Vec<Order>>,
    /// Conversion request, passed through opaquely; the core never
    /// interprets it.
    pub conversions: i64,
    /// New persisted-state string, handed back on the next call.
    pub trader_data: String,
}

/// Per-timestamp sandbox capture for strategy console output.
#[derive(Debug, Default)]
pub struct SandboxLogger {
    lines: Vec<String>,
}

impl SandboxLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one line of strategy output.
    pub fn log(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// `format_args!` convenience, mirroring `println!` usage.
    pub fn logf(&mut self, args: Arguments<'_>) {
        self.lines.push(args.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The captured output as it appears in the timestamp's log row.
    pub fn into_log(self) -> String {
        self.lines.join("\n")
    }
}

/// The single abstract strategy capability.
pub trait Strategy {
    /// Produce this timestamp's orders, conversion request, and persisted
    /// state. Implementations are free to panic or misbehave; the driver
    /// isolates faults at the day level.
    fn run(&mut self, state: &TradingState, log: &mut SandboxLogger) -> StrategyOutput;

    fn name(&self) -> &'static str {
        "unnamed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_defaults_to_zero() {
        let mut state = TradingState::new();
        assert_eq!(state.position_of("KELP"), 0);

        state.position.insert("KELP".to_string(), -12);
        assert_eq!(state.position_of("KELP"), -12);
    }

    #[test]
    fn test_sandbox_logger_joins_lines() {
        let mut log = SandboxLogger::new();
        assert!(log.is_empty());

        log.log("BUY 5x 2028");
        log.logf(format_args!("position now {}", 5));

        assert_eq!(log.into_log(), "BUY 5x 2028\nposition now 5");
    }
}
