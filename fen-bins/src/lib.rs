//! Fen Bins - Command-Line Entry Points
//!
//! The `fen-backtest` binary plus the day-resolution and summary-printing
//! helpers it is built from.

pub mod common;
