//! Semicolon-delimited historical data files
//!
//! Prices live in `round{R}/prices_round_{R}_day_{D}.csv`, trades in
//! `round{R}/trades_round_{R}_day_{D}_{wn,nn}.csv` (de-anonymized data is
//! preferred when both exist). Header rows are skipped. Any missing file or
//! garbled numeric field is surfaced as a [`DataError`] — downstream
//! matching depends on consistent books, so rows are never silently
//! skipped or defaulted.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{DataError, Trade};
use crate::data::store::DayData;
use crate::data::types::PriceRow;

const PRICE_COLUMNS: usize = 17;
const TRADE_COLUMNS: usize = 7;

/// Column indices and names of the up-to-three levels per side.
const BID_PRICE_COLUMNS: [(usize, &str); 3] =
    [(3, "bid_price_1"), (5, "bid_price_2"), (7, "bid_price_3")];
const BID_VOLUME_COLUMNS: [(usize, &str); 3] =
    [(4, "bid_volume_1"), (6, "bid_volume_2"), (8, "bid_volume_3")];
const ASK_PRICE_COLUMNS: [(usize, &str); 3] =
    [(9, "ask_price_1"), (11, "ask_price_2"), (13, "ask_price_3")];
const ASK_VOLUME_COLUMNS: [(usize, &str); 3] =
    [(10, "ask_volume_1"), (12, "ask_volume_2"), (14, "ask_volume_3")];

fn prices_path(data_root: &Path, round: i32, day: i32) -> PathBuf {
    data_root
        .join(format!("round{round}"))
        .join(format!("prices_round_{round}_day_{day}.csv"))
}

fn trades_path(data_root: &Path, round: i32, day: i32, suffix: &str) -> PathBuf {
    data_root
        .join(format!("round{round}"))
        .join(format!("trades_round_{round}_day_{day}_{suffix}.csv"))
}

/// Whether price data exists for the given round/day.
pub fn has_day_data(data_root: &Path, round: i32, day: i32) -> bool {
    prices_path(data_root, round, day).is_file()
}

/// Load and index a full day of historical data.
pub fn read_day_data(data_root: &Path, round: i32, day: i32) -> Result<DayData, DataError> {
    let prices_file = prices_path(data_root, round, day);
    let prices_text = fs::read_to_string(&prices_file).map_err(|_| DataError::MissingFile {
        kind: "Prices",
        round,
        day,
    })?;
    let prices = parse_prices(&file_label(&prices_file), &prices_text)?;

    let mut trades = None;
    for suffix in ["wn", "nn"] {
        let path = trades_path(data_root, round, day, suffix);
        if let Ok(text) = fs::read_to_string(&path) {
            trades = Some(parse_trades(&file_label(&path), &text)?);
            break;
        }
    }
    let trades = trades.ok_or(DataError::MissingFile {
        kind: "Trades",
        round,
        day,
    })?;

    debug!(
        round,
        day,
        price_rows = prices.len(),
        trades = trades.len(),
        "loaded day data"
    );

    Ok(DayData::new(round, day, prices, trades))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a prices file body (header included).
pub fn parse_prices(file: &str, text: &str) -> Result<Vec<PriceRow>, DataError> {
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        rows.push(parse_price_line(file, index + 1, line)?);
    }

    Ok(rows)
}

fn parse_price_line(file: &str, line_no: usize, line: &str) -> Result<PriceRow, DataError> {
    let columns: Vec<&str> = line.split(';').collect();
    if columns.len() < PRICE_COLUMNS {
        return Err(DataError::ShortRow {
            file: file.to_string(),
            line: line_no,
            expected: PRICE_COLUMNS,
            found: columns.len(),
        });
    }

    Ok(PriceRow {
        day: parse_int(file, line_no, "day", columns[0])? as i32,
        timestamp: parse_int(file, line_no, "timestamp", columns[1])?,
        product: columns[2].to_string(),
        bid_prices: parse_levels(file, line_no, &columns, &BID_PRICE_COLUMNS)?,
        bid_volumes: parse_levels(file, line_no, &columns, &BID_VOLUME_COLUMNS)?,
        ask_prices: parse_levels(file, line_no, &columns, &ASK_PRICE_COLUMNS)?,
        ask_volumes: parse_levels(file, line_no, &columns, &ASK_VOLUME_COLUMNS)?,
        mid_price: parse_float(file, line_no, "mid_price", columns[15])?,
        profit_loss: parse_float(file, line_no, "profit_and_loss", columns[16])?,
    })
}

/// Collect level values until the first absent column. An empty field ends
/// that side's levels; a product may legitimately present fewer than three
/// levels per side, or be one-sided.
fn parse_levels(
    file: &str,
    line_no: usize,
    columns: &[&str],
    indices: &[(usize, &'static str)],
) -> Result<Vec<i64>, DataError> {
    let mut values = Vec::with_capacity(indices.len());

    for &(index, name) in indices {
        let value = columns[index];
        if value.is_empty() {
            break;
        }
        values.push(parse_int(file, line_no, name, value)?);
    }

    Ok(values)
}

/// Parse a trades file body (header included).
pub fn parse_trades(file: &str, text: &str) -> Result<Vec<Trade>, DataError> {
    let mut trades = Vec::new();

    for (index, line) in text.lines().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        trades.push(parse_trade_line(file, index + 1, line)?);
    }

    Ok(trades)
}

fn parse_trade_line(file: &str, line_no: usize, line: &str) -> Result<Trade, DataError> {
    let columns: Vec<&str> = line.split(';').collect();
    if columns.len() < TRADE_COLUMNS {
        return Err(DataError::ShortRow {
            file: file.to_string(),
            line: line_no,
            expected: TRADE_COLUMNS,
            found: columns.len(),
        });
    }

    // Trade prices are sometimes written as floats; truncate to ticks.
    let price = parse_float(file, line_no, "price", columns[5])? as i64;

    Ok(Trade {
        symbol: columns[3].to_string(),
        price,
        quantity: parse_int(file, line_no, "quantity", columns[6])?,
        buyer: columns[1].to_string(),
        seller: columns[2].to_string(),
        timestamp: parse_int(file, line_no, "timestamp", columns[0])?,
    })
}

fn parse_int(file: &str, line: usize, column: &'static str, value: &str) -> Result<i64, DataError> {
    value.parse::<i64>().map_err(|_| DataError::BadField {
        file: file.to_string(),
        line,
        column,
        value: value.to_string(),
    })
}

fn parse_float(
    file: &str,
    line: usize,
    column: &'static str,
    value: &str,
) -> Result<f64, DataError> {
    value.parse::<f64>().map_err(|_| DataError::BadField {
        file: file.to_string(),
        line,
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICES_HEADER: &str = "day;timestamp;product;bid_price_1;bid_volume_1;bid_price_2;bid_volume_2;bid_price_3;bid_volume_3;ask_price_1;ask_volume_1;ask_price_2;ask_volume_2;ask_price_3;ask_volume_3;mid_price;profit_and_loss";
    const TRADES_HEADER: &str = "timestamp;buyer;seller;symbol;currency;price;quantity";

    #[test]
    fn test_parse_full_price_row() {
        let text = format!(
            "{PRICES_HEADER}\n0;100;KELP;2028;31;2026;5;2025;2;2030;20;2031;8;2032;1;2029.0;0.0"
        );
        let rows = parse_prices("prices.csv", &text).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.timestamp, 100);
        assert_eq!(row.bid_prices, vec![2028, 2026, 2025]);
        assert_eq!(row.bid_volumes, vec![31, 5, 2]);
        assert_eq!(row.ask_prices, vec![2030, 2031, 2032]);
        assert_eq!(row.ask_volumes, vec![20, 8, 1]);
        assert_eq!(row.mid_price, 2029.0);
    }

    #[test]
    fn test_parse_partial_levels() {
        let text = format!("{PRICES_HEADER}\n0;100;KELP;2028;31;;;;;2030;20;;;;;2029.0;0.0");
        let rows = parse_prices("prices.csv", &text).unwrap();

        assert_eq!(rows[0].bid_prices, vec![2028]);
        assert_eq!(rows[0].ask_prices, vec![2030]);
    }

    #[test]
    fn test_parse_one_sided_book() {
        let text = format!("{PRICES_HEADER}\n0;100;KELP;;;;;;;2030;20;;;;;2030.0;0.0");
        let rows = parse_prices("prices.csv", &text).unwrap();

        assert!(rows[0].bid_prices.is_empty());
        assert_eq!(rows[0].ask_prices, vec![2030]);
    }

    #[test]
    fn test_garbled_numeric_field_is_an_error() {
        let text = format!("{PRICES_HEADER}\n0;100;KELP;2O28;31;;;;;2030;20;;;;;2029.0;0.0");
        let err = parse_prices("prices.csv", &text).unwrap_err();

        match err {
            DataError::BadField { line, column, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "bid_price_1");
                assert_eq!(value, "2O28");
            }
            other => panic!("expected BadField, got {other:?}"),
        }
    }

    #[test]
    fn test_short_price_row_is_an_error() {
        let text = format!("{PRICES_HEADER}\n0;100;KELP;2028;31");
        assert!(matches!(
            parse_prices("prices.csv", &text).unwrap_err(),
            DataError::ShortRow { .. }
        ));
    }

    #[test]
    fn test_parse_trades_with_blank_parties() {
        let text = format!("{TRADES_HEADER}\n100;;;KELP;SEASHELLS;2028.0;3");
        let trades = parse_trades("trades.csv", &text).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 2028);
        assert_eq!(trades[0].quantity, 3);
        assert_eq!(trades[0].buyer, "");
        assert_eq!(trades[0].seller, "");
    }

    #[test]
    fn test_trade_float_price_truncates_to_ticks() {
        let text = format!("{TRADES_HEADER}\n100;A;B;KELP;SEASHELLS;2028.7;3");
        let trades = parse_trades("trades.csv", &text).unwrap();
        assert_eq!(trades[0].price, 2028);
    }
}
