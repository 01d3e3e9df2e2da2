//! Backtest results and the output log
//!
//! A day's result holds three row streams that become the three sections
//! of the output log: per-timestamp sandbox rows (captured strategy output
//! plus limit-violation notes), per-timestamp-per-product activity rows
//! (mark-to-market profit/loss), and the trade history (executions plus
//! residual market trades). Absent book levels render as empty fields,
//! never zero — "no 3rd level" is not "3rd level priced at 0".

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::{Symbol, Timestamp, Trade};
use crate::data::PriceRow;

/// Currency stamped on every trade-history entry.
pub const CURRENCY: &str = "SEASHELLS";

pub const ACTIVITY_LOG_HEADER: &str = "day;timestamp;product;bid_price_1;bid_volume_1;bid_price_2;bid_volume_2;bid_price_3;bid_volume_3;ask_price_1;ask_volume_1;ask_price_2;ask_volume_2;ask_price_3;ask_volume_3;mid_price;profit_and_loss";

/// One timestamp's sandbox capture.
#[derive(Debug, Clone, Serialize)]
pub struct SandboxLogRow {
    #[serde(rename = "sandboxLog")]
    pub sandbox_log: String,
    #[serde(rename = "lambdaLog")]
    pub lambda_log: String,
    pub timestamp: Timestamp,
}

impl SandboxLogRow {
    pub fn with_offset(&self, timestamp_offset: Timestamp) -> Self {
        Self {
            sandbox_log: self.sandbox_log.clone(),
            lambda_log: self.lambda_log.clone(),
            timestamp: self.timestamp + timestamp_offset,
        }
    }
}

impl fmt::Display for SandboxLogRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{json}")
    }
}

/// One product's activity row at one timestamp.
#[derive(Debug, Clone)]
pub struct ActivityLogRow {
    pub day: i32,
    pub timestamp: Timestamp,
    pub product: Symbol,
    pub bid_prices: Vec<i64>,
    pub bid_volumes: Vec<i64>,
    pub ask_prices: Vec<i64>,
    pub ask_volumes: Vec<i64>,
    pub mid_price: f64,
    pub profit_loss: f64,
}

impl ActivityLogRow {
    /// Build the row from the snapshot and the current mark-to-market
    /// profit/loss figure.
    pub fn from_row(day: i32, row: &PriceRow, profit_loss: f64) -> Self {
        Self {
            day,
            timestamp: row.timestamp,
            product: row.product.clone(),
            bid_prices: row.bid_prices.clone(),
            bid_volumes: row.bid_volumes.clone(),
            ask_prices: row.ask_prices.clone(),
            ask_volumes: row.ask_volumes.clone(),
            mid_price: row.mid_price,
            profit_loss,
        }
    }

    pub fn with_offset(&self, timestamp_offset: Timestamp, profit_loss_offset: f64) -> Self {
        let mut row = self.clone();
        row.timestamp += timestamp_offset;
        row.profit_loss += profit_loss_offset;
        row
    }
}

fn write_level(f: &mut fmt::Formatter<'_>, values: &[i64], index: usize) -> fmt::Result {
    match values.get(index) {
        Some(value) => write!(f, ";{value}"),
        None => write!(f, ";"),
    }
}

impl fmt::Display for ActivityLogRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.day, self.timestamp, self.product)?;
        for index in 0..3 {
            write_level(f, &self.bid_prices, index)?;
            write_level(f, &self.bid_volumes, index)?;
        }
        for index in 0..3 {
            write_level(f, &self.ask_prices, index)?;
            write_level(f, &self.ask_volumes, index)?;
        }
        // {:?} keeps the data files' float convention: 2029.0, not 2029
        write!(f, ";{:?};{:?}", self.mid_price, self.profit_loss)
    }
}

/// One trade-history entry.
#[derive(Debug, Clone)]
pub struct TradeRow(pub Trade);

impl TradeRow {
    pub fn with_offset(&self, timestamp_offset: Timestamp) -> Self {
        let mut trade = self.0.clone();
        trade.timestamp += timestamp_offset;
        Self(trade)
    }
}

#[derive(Serialize)]
struct TradeRowJson<'a> {
    timestamp: Timestamp,
    buyer: &'a str,
    seller: &'a str,
    symbol: &'a str,
    currency: &'static str,
    price: i64,
    quantity: i64,
}

impl fmt::Display for TradeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&TradeRowJson {
            timestamp: self.0.timestamp,
            buyer: &self.0.buyer,
            seller: &self.0.seller,
            symbol: &self.0.symbol,
            currency: CURRENCY,
            price: self.0.price,
            quantity: self.0.quantity,
        })
        .map_err(|_| fmt::Error)?;
        write!(f, "{json}")
    }
}

/// Everything one day's run produced.
#[derive(Debug, Clone, Default)]
pub struct BacktestResult {
    pub round: i32,
    pub day: i32,
    pub sandbox_logs: Vec<SandboxLogRow>,
    pub activity_logs: Vec<ActivityLogRow>,
    pub trades: Vec<TradeRow>,
}

impl BacktestResult {
    pub fn new(round: i32, day: i32) -> Self {
        Self {
            round,
            day,
            ..Self::default()
        }
    }

    /// Final per-product profit/loss figures: the activity rows of the
    /// day's last timestamp.
    pub fn final_profit_loss(&self) -> BTreeMap<Symbol, f64> {
        let mut totals = BTreeMap::new();
        let Some(last) = self.activity_logs.last() else {
            return totals;
        };
        for row in self.activity_logs.iter().rev() {
            if row.timestamp != last.timestamp {
                break;
            }
            totals.insert(row.product.clone(), row.profit_loss);
        }
        totals
    }
}

/// Merge two day results into one log, offsetting the second day's
/// timestamps past the first's (unless original timestamps are kept) and
/// optionally carrying profit/loss forward across the boundary.
pub fn merge_results(
    a: BacktestResult,
    b: &BacktestResult,
    merge_profit_loss: bool,
    merge_timestamps: bool,
) -> BacktestResult {
    let last_timestamp = a
        .activity_logs
        .last()
        .map(|row| row.timestamp)
        .unwrap_or(0);
    let timestamp_offset = if merge_timestamps {
        last_timestamp + 100
    } else {
        0
    };

    let profit_loss_offsets = if merge_profit_loss {
        a.final_profit_loss()
    } else {
        BTreeMap::new()
    };

    let mut merged = a;
    merged
        .sandbox_logs
        .extend(b.sandbox_logs.iter().map(|row| row.with_offset(timestamp_offset)));
    merged.activity_logs.extend(b.activity_logs.iter().map(|row| {
        let offset = profit_loss_offsets.get(&row.product).copied().unwrap_or(0.0);
        row.with_offset(timestamp_offset, offset)
    }));
    merged
        .trades
        .extend(b.trades.iter().map(|row| row.with_offset(timestamp_offset)));

    merged
}

/// Write the three-section output log.
pub fn write_output(path: &Path, result: &BacktestResult) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;

    writeln!(file, "Sandbox logs:")?;
    for row in &result.sandbox_logs {
        writeln!(file, "{row}")?;
    }

    write!(file, "\n\n\nActivities log:\n")?;
    writeln!(file, "{ACTIVITY_LOG_HEADER}")?;
    let activity_rows: Vec<String> = result.activity_logs.iter().map(|row| row.to_string()).collect();
    write!(file, "{}", activity_rows.join("\n"))?;

    write!(file, "\n\n\n\n\nTrade History:\n[\n")?;
    let trade_rows: Vec<String> = result.trades.iter().map(|row| row.to_string()).collect();
    write!(file, "{}", trade_rows.join(",\n"))?;
    write!(file, "]")?;

    Ok(())
}
