//! Static position limits and pre-matching batch enforcement.

pub mod limits;

pub use limits::{enforce_limits, PositionLimits};
