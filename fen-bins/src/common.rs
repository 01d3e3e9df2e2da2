//! Common utilities for the binaries
//!
//! Day-argument parsing, profit formatting, and the per-day and overall
//! summaries printed after a run.

use std::path::Path;

use fen_core::data::has_day_data;
use fen_core::report::BacktestResult;

/// Days in a round are probed in this range when only a round is given.
const DAY_RANGE: std::ops::Range<i32> = -5..6;

/// Resolve day arguments against the data directory.
///
/// `<round>-<day>` selects a single day, `<round>` selects every day of
/// the round that has data. Arguments without data produce a warning and
/// are skipped; the caller decides what an empty result means.
pub fn parse_days(data_root: &Path, days: &[String]) -> Vec<(i32, i32)> {
    let mut parsed = Vec::new();

    for arg in days {
        match parse_day_arg(arg) {
            Some((round, Some(day))) => {
                if has_day_data(data_root, round, day) {
                    parsed.push((round, day));
                } else {
                    println!("Warning: no data found for round {round} day {day}");
                }
            }
            Some((round, None)) => {
                let in_round: Vec<(i32, i32)> = DAY_RANGE
                    .clone()
                    .filter(|&day| has_day_data(data_root, round, day))
                    .map(|day| (round, day))
                    .collect();
                if in_round.is_empty() {
                    println!("Warning: no data found for round {round}");
                }
                parsed.extend(in_round);
            }
            None => println!("Warning: cannot parse day argument {arg:?}"),
        }
    }

    parsed
}

/// `"1-0"` → round 1 day 0, `"1--2"` → round 1 day -2, `"2"` → all of
/// round 2.
fn parse_day_arg(arg: &str) -> Option<(i32, Option<i32>)> {
    match arg.split_once('-') {
        Some((round, day)) => Some((round.parse().ok()?, Some(day.parse().ok()?))),
        None => Some((arg.parse().ok()?, None)),
    }
}

/// Thousands-separated whole-number profit, matching `{:,.0f}`.
pub fn format_profit(profit: f64) -> String {
    let rounded = profit.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Per-product profit of a finished day, plus the day total.
pub fn print_day_summary(result: &BacktestResult) {
    let totals = result.final_profit_loss();

    let mut total_profit = 0.0;
    for (product, profit) in &totals {
        println!("{product}: {}", format_profit(*profit));
        total_profit += profit;
    }
    println!("Total profit: {}", format_profit(total_profit));
    println!();
}

/// Per-day totals across the whole run.
pub fn print_overall_summary(results: &[BacktestResult]) {
    println!("Profit summary:");

    let mut total_profit = 0.0;
    for result in results {
        let day_profit: f64 = result.final_profit_loss().values().sum();
        println!(
            "Round {} day {}: {}",
            result.round,
            result.day,
            format_profit(day_profit)
        );
        total_profit += day_profit;
    }

    println!("Total profit: {}", format_profit(total_profit));
}
