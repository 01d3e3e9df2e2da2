//! Domain types and error taxonomy shared across the engine.

pub mod errors;
pub mod types;

pub use errors::{DataError, RunError};
pub use types::{Order, Symbol, Timestamp, Trade, SUBMISSION};
