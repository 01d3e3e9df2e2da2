//! Backtest a strategy against historical order-book data
//!
//! Replays the requested days in order, prints a profit summary per day,
//! and writes the combined three-section output log. A failing day (bad
//! data, strategy panic) is reported and the run continues with the
//! remaining days.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::error;

use fen_bins::common::{parse_days, print_day_summary, print_overall_summary};
use fen_core::data::read_day_data;
use fen_core::report::{merge_results, write_output, BacktestResult};
use fen_core::utils::init_logger;
use fen_core::{run_day, PositionLimits, TradeMatchingMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Backtest a strategy against historical order-book data")]
struct Args {
    /// The days to backtest on. <round>-<day> for a single day, <round>
    /// for all days in a round
    #[arg(required = true)]
    days: Vec<String>,

    /// Name of the strategy to backtest
    #[arg(short, long, default_value = "fair-value")]
    strategy: String,

    /// Path to the data directory
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// How to match orders against historical market trades. 'all' matches
    /// trades priced equal to or worse than your quotes, 'worse' matches
    /// trades priced strictly worse, 'none' skips trade matching entirely
    #[arg(long, default_value_t = TradeMatchingMode::All)]
    match_trades: TradeMatchingMode,

    /// File to save the output log to (defaults to backtests/<timestamp>.log)
    #[arg(long, conflicts_with = "no_out")]
    out: Option<PathBuf>,

    /// Skip saving the output log
    #[arg(long)]
    no_out: bool,

    /// Merge profit and loss across days
    #[arg(long)]
    merge_pnl: bool,

    /// Preserve original timestamps in the output log rather than making
    /// them increase across days
    #[arg(long)]
    original_timestamps: bool,

    /// Position limit override as PRODUCT=LIMIT, repeatable
    #[arg(long = "limit", value_parser = parse_limit)]
    limits: Vec<(String, i64)>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn parse_limit(arg: &str) -> Result<(String, i64), String> {
    let (product, limit) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT=LIMIT, got {arg:?}"))?;
    let limit: i64 = limit
        .parse()
        .map_err(|_| format!("unparseable limit in {arg:?}"))?;
    if limit < 0 {
        return Err(format!("limit must be non-negative in {arg:?}"));
    }
    Ok((product.to_string(), limit))
}

fn default_limits() -> PositionLimits {
    PositionLimits::new()
        .with("RAINFOREST_RESIN", 50)
        .with("KELP", 50)
}

fn default_out_path() -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from("backtests").join(format!("{timestamp}.log"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    if fen_strategies::by_name(&args.strategy).is_none() {
        bail!("unknown strategy {:?}", args.strategy);
    }

    let days = parse_days(&args.data, &args.days);
    if days.is_empty() {
        bail!("did not find data for any requested round/day");
    }

    let mut limits = default_limits();
    for (product, limit) in &args.limits {
        limits.insert(product.clone(), *limit);
    }

    let mut results: Vec<BacktestResult> = Vec::new();
    for (round, day) in days {
        println!("Backtesting {} on round {round} day {day}", args.strategy);

        // Fresh strategy per day: nothing survives day boundaries.
        let mut strategy = fen_strategies::by_name(&args.strategy)
            .context("strategy disappeared between validation and run")?;

        let outcome = read_day_data(&args.data, round, day)
            .map_err(Into::into)
            .and_then(|data| run_day(strategy.as_mut(), &data, &limits, args.match_trades));

        match outcome {
            Ok(result) => {
                print_day_summary(&result);
                results.push(result);
            }
            Err(err) => {
                error!(round, day, %err, "day failed");
                println!("Round {round} day {day} failed: {err}");
                println!();
            }
        }
    }

    if results.is_empty() {
        bail!("every requested day failed");
    }

    if results.len() > 1 {
        print_overall_summary(&results);
    }

    if !args.no_out {
        let path = args.out.clone().unwrap_or_else(default_out_path);
        let mut iter = results.into_iter();
        let first = iter.next().context("no results to merge")?;
        let merged = iter.fold(first, |acc, next| {
            merge_results(acc, &next, args.merge_pnl, !args.original_timestamps)
        });
        write_output(&path, &merged)
            .with_context(|| format!("failed to write output log to {}", path.display()))?;
        println!("Successfully saved backtest results to {}", path.display());
    }

    Ok(())
}
