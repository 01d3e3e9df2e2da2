//! Loading day data from a real data directory
//!
//! Filesystem-level tests with tempfile: the directory layout, the
//! wn-before-nn trades file preference, and error reporting on missing or
//! corrupt files.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use fen_core::data::{has_day_data, read_day_data};
use fen_core::DataError;

const PRICES_HEADER: &str = "day;timestamp;product;bid_price_1;bid_volume_1;bid_price_2;bid_volume_2;bid_price_3;bid_volume_3;ask_price_1;ask_volume_1;ask_price_2;ask_volume_2;ask_price_3;ask_volume_3;mid_price;profit_and_loss";
const TRADES_HEADER: &str = "timestamp;buyer;seller;symbol;currency;price;quantity";

fn write_file(root: &Path, name: &str, body: &str) {
    let path = root.join("round1").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn write_prices(root: &Path, day: i32) {
    write_file(
        root,
        &format!("prices_round_1_day_{day}.csv"),
        &format!("{PRICES_HEADER}\n{day};0;KELP;2028;31;;;;;2030;20;;;;;2029.0;0.0\n"),
    );
}

fn write_trades(root: &Path, day: i32, suffix: &str, buyer: &str) {
    write_file(
        root,
        &format!("trades_round_1_day_{day}_{suffix}.csv"),
        &format!("{TRADES_HEADER}\n0;{buyer};Ruby;KELP;SEASHELLS;2029.0;5\n"),
    );
}

#[test]
fn test_reads_prices_and_trades() {
    let dir = TempDir::new().unwrap();
    write_prices(dir.path(), 0);
    write_trades(dir.path(), 0, "nn", "");

    let data = read_day_data(dir.path(), 1, 0).unwrap();

    assert_eq!(data.round(), 1);
    assert_eq!(data.day(), 0);
    assert_eq!(data.products(), ["KELP".to_string()]);
    assert_eq!(data.price(0, "KELP").unwrap().mid_price, 2029.0);
    assert_eq!(data.trades_at(0, "KELP").len(), 1);
}

#[test]
fn test_prefers_deanonymized_trades() {
    let dir = TempDir::new().unwrap();
    write_prices(dir.path(), 0);
    write_trades(dir.path(), 0, "wn", "Amir");
    write_trades(dir.path(), 0, "nn", "");

    let data = read_day_data(dir.path(), 1, 0).unwrap();

    assert_eq!(data.trades_at(0, "KELP")[0].buyer, "Amir");
}

#[test]
fn test_falls_back_to_anonymized_trades() {
    let dir = TempDir::new().unwrap();
    write_prices(dir.path(), 0);
    write_trades(dir.path(), 0, "nn", "");

    let data = read_day_data(dir.path(), 1, 0).unwrap();

    assert_eq!(data.trades_at(0, "KELP")[0].buyer, "");
}

#[test]
fn test_missing_prices_file() {
    let dir = TempDir::new().unwrap();

    let err = read_day_data(dir.path(), 1, -2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Prices data is not available for round 1 day -2"
    );
}

#[test]
fn test_missing_trades_file() {
    let dir = TempDir::new().unwrap();
    write_prices(dir.path(), 0);

    let err = read_day_data(dir.path(), 1, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Trades data is not available for round 1 day 0"
    );
}

#[test]
fn test_corrupt_field_names_file_and_line() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "prices_round_1_day_0.csv",
        &format!("{PRICES_HEADER}\n0;0;KELP;bad;31;;;;;2030;20;;;;;2029.0;0.0\n"),
    );
    write_trades(dir.path(), 0, "nn", "");

    let err = read_day_data(dir.path(), 1, 0).unwrap_err();
    match err {
        DataError::BadField { file, line, .. } => {
            assert_eq!(file, "prices_round_1_day_0.csv");
            assert_eq!(line, 2);
        }
        other => panic!("expected BadField, got {other:?}"),
    }
}

#[test]
fn test_has_day_data_probes_prices_only() {
    let dir = TempDir::new().unwrap();
    write_prices(dir.path(), -1);

    assert!(has_day_data(dir.path(), 1, -1));
    assert!(!has_day_data(dir.path(), 1, 0));
    assert!(!has_day_data(dir.path(), 2, -1));
}
