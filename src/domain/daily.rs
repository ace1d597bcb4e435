//! Calendar-day aggregation of closed trades.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::trade::TradeRecord;

/// Display ordering for day-keyed tables. Display-only: computed statistics
/// never depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    #[default]
    Ascending,
    Descending,
}

impl DateOrder {
    pub fn parse(value: &str) -> Option<DateOrder> {
        match value.trim().to_lowercase().as_str() {
            "ascending" | "asc" => Some(DateOrder::Ascending),
            "descending" | "desc" => Some(DateOrder::Descending),
            _ => None,
        }
    }
}

/// One row per calendar day on which at least one trade closed. Days
/// without a close are never materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub day: NaiveDate,
    pub trades: usize,
    pub volume: f64,
    pub profit: f64,
    pub commissions: f64,
    pub net_profit: f64,
}

/// Group trades by the calendar day of their close time. The day is read
/// straight off the naive journal timestamp — no timezone conversion, the
/// journal's own clock is the bucketing clock.
pub fn aggregate_daily(trades: &[TradeRecord], order: DateOrder) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();

    for trade in trades {
        let day = trade.close_time.date();
        let row = days.entry(day).or_insert(DailyAggregate {
            day,
            trades: 0,
            volume: 0.0,
            profit: 0.0,
            commissions: 0.0,
            net_profit: 0.0,
        });
        row.trades += 1;
        row.volume += trade.volume;
        row.profit += trade.profit;
        row.commissions += trade.commissions;
        row.net_profit += trade.net_profit();
    }

    let mut rows: Vec<DailyAggregate> = days.into_values().collect();
    if order == DateOrder::Descending {
        rows.reverse();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Side;
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_trade(close: &str, volume: f64, profit: f64, commissions: f64) -> TradeRecord {
        let close_time = dt(close);
        TradeRecord {
            ticket: "1".into(),
            symbol: "EURUSD".into(),
            side: Side::Buy,
            volume,
            open_time: close_time - chrono::Duration::hours(1),
            close_time,
            open_price: 1.0,
            close_price: 1.1,
            profit,
            commissions,
        }
    }

    #[test]
    fn groups_by_close_day() {
        let trades = vec![
            make_trade("2024-01-02 09:00:00", 1.0, 100.0, -5.0),
            make_trade("2024-01-02 18:30:00", 2.0, -40.0, -5.0),
            make_trade("2024-01-04 11:00:00", 0.5, 25.0, -2.0),
        ];
        let rows = aggregate_daily(&trades, DateOrder::Ascending);

        assert_eq!(rows.len(), 2);
        let first = &rows[0];
        assert_eq!(first.day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(first.trades, 2);
        assert!((first.volume - 3.0).abs() < f64::EPSILON);
        assert!((first.profit - 60.0).abs() < f64::EPSILON);
        assert!((first.commissions - (-10.0)).abs() < f64::EPSILON);
        assert!((first.net_profit - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_empty_days_synthesized() {
        let trades = vec![
            make_trade("2024-01-01 09:00:00", 1.0, 10.0, 0.0),
            make_trade("2024-01-05 09:00:00", 1.0, 10.0, 0.0),
        ];
        let rows = aggregate_daily(&trades, DateOrder::Ascending);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn descending_order_reverses_days_only() {
        let trades = vec![
            make_trade("2024-01-01 09:00:00", 1.0, 10.0, 0.0),
            make_trade("2024-01-03 09:00:00", 1.0, 20.0, 0.0),
        ];
        let asc = aggregate_daily(&trades, DateOrder::Ascending);
        let desc = aggregate_daily(&trades, DateOrder::Descending);

        assert_eq!(asc.len(), desc.len());
        assert_eq!(asc[0], desc[1]);
        assert_eq!(asc[1], desc[0]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let rows = aggregate_daily(&[], DateOrder::Ascending);
        assert!(rows.is_empty());
    }

    #[test]
    fn day_totals_conserve_net_profit() {
        let trades = vec![
            make_trade("2024-01-01 09:00:00", 1.0, 100.0, -3.0),
            make_trade("2024-01-01 23:59:59", 1.0, -50.0, -3.0),
            make_trade("2024-01-02 00:00:00", 1.0, 30.0, -3.0),
        ];
        let rows = aggregate_daily(&trades, DateOrder::Ascending);

        let total: f64 = rows.iter().map(|r| r.net_profit).sum();
        let expected: f64 = trades.iter().map(|t| t.net_profit()).sum();
        assert!((total - expected).abs() < 1e-9);

        // midnight close lands on the new day
        assert_eq!(rows[0].trades, 2);
        assert_eq!(rows[1].trades, 1);
    }

    #[test]
    fn date_order_parse() {
        assert_eq!(DateOrder::parse("ascending"), Some(DateOrder::Ascending));
        assert_eq!(DateOrder::parse("DESC"), Some(DateOrder::Descending));
        assert_eq!(DateOrder::parse("sideways"), None);
    }
}
