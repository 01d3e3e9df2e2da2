//! The do-nothing strategy
//!
//! Useful as a baseline: a day replayed against `Idle` produces zero
//! profit everywhere and exposes the engine's bookkeeping (residual market
//! trades, activity rows) without any strategy interference.

use fen_core::{SandboxLogger, Strategy, StrategyOutput, TradingState};

#[derive(Debug, Default, Clone, Copy)]
pub struct Idle;

impl Strategy for Idle {
    fn run(&mut self, state: &TradingState, _log: &mut SandboxLogger) -> StrategyOutput {
        StrategyOutput {
            trader_data: state.trader_data.clone(),
            ..StrategyOutput::default()
        }
    }

    fn name(&self) -> &'static str {
        "idle"
    }
}
