//! Analysis orchestration: filtering, pipeline staging, result assembly.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

use super::daily::{aggregate_daily, DailyAggregate, DateOrder};
use super::equity::{EquityCurve, NetProfitSeries};
use super::error::JournalError;
use super::stats::Statistics;
use super::trade::TradeRecord;

/// Parameters for one analysis run, originating from config and CLI flags.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Close-day range filter, inclusive on both ends.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Symbol allow-list; empty selects every instrument.
    pub symbols: Vec<String>,
    pub initial_balance: f64,
    /// Account creation instant; defaults to the earliest open time when
    /// absent.
    pub account_start: Option<NaiveDateTime>,
    pub date_order: DateOrder,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            start_date: None,
            end_date: None,
            symbols: Vec::new(),
            initial_balance: 1_000_000.0,
            account_start: None,
            date_order: DateOrder::Ascending,
        }
    }
}

/// Everything one analysis run produces. Each field is an immutable
/// snapshot; nothing here aliases the input trades.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub trades: Vec<TradeRecord>,
    pub net_profits: NetProfitSeries,
    pub equity: EquityCurve,
    pub daily: Vec<DailyAggregate>,
    pub stats: Statistics,
}

/// Apply the date-range and symbol filters. The range is inclusive and
/// keyed on the close day; a requested symbol missing from the journal is
/// an error rather than an empty result.
pub fn filter_trades(
    trades: &[TradeRecord],
    config: &AnalysisConfig,
) -> Result<Vec<TradeRecord>, JournalError> {
    if !config.symbols.is_empty() {
        let present: BTreeSet<&str> = trades.iter().map(|t| t.symbol.as_str()).collect();
        for symbol in &config.symbols {
            if !present.contains(symbol.as_str()) {
                return Err(JournalError::UnknownSymbol {
                    symbol: symbol.clone(),
                });
            }
        }
    }

    Ok(trades
        .iter()
        .filter(|t| {
            let day = t.close_time.date();
            if let Some(start) = config.start_date {
                if day < start {
                    return false;
                }
            }
            if let Some(end) = config.end_date {
                if day > end {
                    return false;
                }
            }
            config.symbols.is_empty() || config.symbols.iter().any(|s| *s == t.symbol)
        })
        .cloned()
        .collect())
}

/// Run the full pipeline: filter, validate, build the net-profit series,
/// replay the equity curve, bucket by day, derive statistics.
pub fn run_analysis(
    trades: &[TradeRecord],
    config: &AnalysisConfig,
) -> Result<AnalysisResult, JournalError> {
    let selected = filter_trades(trades, config)?;
    for trade in &selected {
        trade.validate()?;
    }

    let net_profits = NetProfitSeries::from_trades(&selected);
    let daily = aggregate_daily(&selected, config.date_order);
    let stats = Statistics::compute(&net_profits, &daily);

    let earliest_open = selected.iter().map(|t| t.open_time).min();
    let equity = match (config.account_start, earliest_open) {
        (Some(anchor), Some(earliest)) => {
            // config surface promises the account predates the data
            if anchor > earliest {
                return Err(JournalError::InvalidAnchor { anchor, earliest });
            }
            EquityCurve::reconstruct(&net_profits, anchor, config.initial_balance)?
        }
        (None, Some(earliest)) => {
            EquityCurve::reconstruct(&net_profits, earliest, config.initial_balance)?
        }
        (Some(anchor), None) => {
            EquityCurve::reconstruct(&net_profits, anchor, config.initial_balance)?
        }
        (None, None) => EquityCurve::flat(config.initial_balance),
    };

    Ok(AnalysisResult {
        trades: selected,
        net_profits,
        equity,
        daily,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Side;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_trade(ticket: &str, symbol: &str, close: &str, net: f64) -> TradeRecord {
        let close_time = dt(close);
        TradeRecord {
            ticket: ticket.into(),
            symbol: symbol.into(),
            side: Side::Buy,
            volume: 1.0,
            open_time: close_time - chrono::Duration::hours(3),
            close_time,
            open_price: 1.0,
            close_price: 1.1,
            profit: net,
            commissions: 0.0,
        }
    }

    fn sample_trades() -> Vec<TradeRecord> {
        vec![
            make_trade("1", "EURUSD", "2024-01-02 10:00:00", 100.0),
            make_trade("2", "XAUUSD", "2024-01-03 10:00:00", -40.0),
            make_trade("3", "EURUSD", "2024-01-05 10:00:00", 60.0),
        ]
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let config = AnalysisConfig {
            start_date: Some(day(2024, 1, 3)),
            end_date: Some(day(2024, 1, 5)),
            ..AnalysisConfig::default()
        };
        let selected = filter_trades(&sample_trades(), &config).unwrap();

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].ticket, "2");
        assert_eq!(selected[1].ticket, "3");
    }

    #[test]
    fn symbol_filter_selects_subset() {
        let config = AnalysisConfig {
            symbols: vec!["EURUSD".to_string()],
            ..AnalysisConfig::default()
        };
        let selected = filter_trades(&sample_trades(), &config).unwrap();

        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|t| t.symbol == "EURUSD"));
    }

    #[test]
    fn unknown_symbol_in_filter_fails() {
        let config = AnalysisConfig {
            symbols: vec!["GBPJPY".to_string()],
            ..AnalysisConfig::default()
        };
        let err = filter_trades(&sample_trades(), &config).unwrap_err();
        assert!(matches!(err, JournalError::UnknownSymbol { symbol } if symbol == "GBPJPY"));
    }

    #[test]
    fn analysis_threads_trades_through_every_stage() {
        let config = AnalysisConfig {
            initial_balance: 1_000.0,
            ..AnalysisConfig::default()
        };
        let result = run_analysis(&sample_trades(), &config).unwrap();

        assert_eq!(result.trades.len(), 3);
        assert_eq!(result.net_profits.len(), 3);
        assert_eq!(result.daily.len(), 3);
        assert_eq!(result.stats.trade_count, 3);
        assert!((result.equity.final_balance() - 1_120.0).abs() < 1e-9);
    }

    #[test]
    fn daily_totals_match_series_total() {
        let config = AnalysisConfig::default();
        let result = run_analysis(&sample_trades(), &config).unwrap();

        let daily_total: f64 = result.daily.iter().map(|d| d.net_profit).sum();
        assert!((daily_total - result.net_profits.total()).abs() < 1e-9);
    }

    #[test]
    fn anchor_defaults_to_earliest_open_time() {
        let config = AnalysisConfig {
            initial_balance: 500.0,
            ..AnalysisConfig::default()
        };
        let result = run_analysis(&sample_trades(), &config).unwrap();

        assert_eq!(result.equity.points()[0].time, dt("2024-01-02 07:00:00"));
        assert!((result.equity.points()[0].balance - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn anchor_after_earliest_open_fails() {
        let config = AnalysisConfig {
            account_start: Some(dt("2024-01-02 08:00:00")),
            ..AnalysisConfig::default()
        };
        let err = run_analysis(&sample_trades(), &config).unwrap_err();
        assert!(matches!(err, JournalError::InvalidAnchor { .. }));
    }

    #[test]
    fn empty_journal_analyzes_to_flat_curve() {
        let config = AnalysisConfig::default();
        let result = run_analysis(&[], &config).unwrap();

        assert!(result.trades.is_empty());
        assert!(result.daily.is_empty());
        assert_eq!(result.stats.win_rate, None);
        assert!(
            (result.equity.final_balance() - config.initial_balance).abs() < f64::EPSILON
        );
    }

    #[test]
    fn malformed_trade_aborts_analysis() {
        let mut trades = sample_trades();
        trades[1].volume = -1.0;

        let err = run_analysis(&trades, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, JournalError::MalformedRecord { ticket, .. } if ticket == "2"));
    }
}
