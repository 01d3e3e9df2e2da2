//! Error taxonomy for the backtester
//!
//! Two failure classes are errors here: data-integrity problems (fatal for
//! the affected day, never silently defaulted) and strategy faults
//! (recovered at the day level). Limit violations and unfilled order
//! remainders are expected business outcomes, not errors.

use crate::core::{Symbol, Timestamp};
use thiserror::Error;

/// Data-integrity failures while loading or validating a day's data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required data file does not exist.
    #[error("{kind} data is not available for round {round} day {day}")]
    MissingFile {
        kind: &'static str,
        round: i32,
        day: i32,
    },

    /// A numeric field could not be parsed.
    #[error("{file}:{line}: unparseable {column} value {value:?}")]
    BadField {
        file: String,
        line: usize,
        column: &'static str,
        value: String,
    },

    /// A row has fewer columns than the format requires.
    #[error("{file}:{line}: expected {expected} columns, found {found}")]
    ShortRow {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A tradable product has no configured position limit.
    #[error("no position limit configured for product {0}")]
    MissingLimit(Symbol),
}

/// Failures that abort a single day's run. In a multi-day batch the driver
/// reports these and proceeds to the next day.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Data(#[from] DataError),

    /// A panic escaped the strategy callback.
    #[error("strategy panicked at timestamp {timestamp}: {message}")]
    StrategyPanic {
        timestamp: Timestamp,
        message: String,
    },
}
