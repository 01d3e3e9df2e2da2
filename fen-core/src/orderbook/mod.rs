//! Synthetic per-timestamp order book.

pub mod depth;

pub use depth::OrderDepth;
