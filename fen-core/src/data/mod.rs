//! Historical data loading and the per-day market data store.

pub mod loader;
pub mod store;
pub mod types;

pub use loader::{has_day_data, read_day_data};
pub use store::DayData;
pub use types::PriceRow;
