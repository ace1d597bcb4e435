#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use journalyzer::domain::error::JournalError;
use journalyzer::domain::trade::{Side, TradeRecord};
use journalyzer::ports::journal_port::JournalPort;

pub struct MockJournalPort {
    pub trades: Vec<TradeRecord>,
    pub error: Option<String>,
}

impl MockJournalPort {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_trades(mut self, trades: Vec<TradeRecord>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl JournalPort for MockJournalPort {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, JournalError> {
        if let Some(reason) = &self.error {
            return Err(JournalError::Io {
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }

    fn list_symbols(&self) -> Result<Vec<String>, JournalError> {
        let mut symbols: Vec<String> = self
            .fetch_trades()?
            .into_iter()
            .map(|t| t.symbol)
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn data_range(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, JournalError> {
        let trades = self.fetch_trades()?;
        if trades.is_empty() {
            return Ok(None);
        }
        let first_open = trades.iter().map(|t| t.open_time).min().unwrap();
        let last_close = trades.iter().map(|t| t.close_time).max().unwrap();
        Ok(Some((first_open, last_close, trades.len())))
    }
}

pub fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_trade(
    ticket: &str,
    symbol: &str,
    side: Side,
    volume: f64,
    open: &str,
    close: &str,
    profit: f64,
    commissions: f64,
) -> TradeRecord {
    TradeRecord {
        ticket: ticket.to_string(),
        symbol: symbol.to_string(),
        side,
        volume,
        open_time: dt(open),
        close_time: dt(close),
        open_price: 100.0,
        close_price: 101.0,
        profit,
        commissions,
    }
}

/// Buy trade with one-hour duration ending at `close`, standard prices.
pub fn quick_trade(ticket: &str, symbol: &str, close: &str, profit: f64) -> TradeRecord {
    let close_time = dt(close);
    TradeRecord {
        ticket: ticket.to_string(),
        symbol: symbol.to_string(),
        side: Side::Buy,
        volume: 1.0,
        open_time: close_time - chrono::Duration::hours(1),
        close_time,
        open_price: 100.0,
        close_price: 101.0,
        profit,
        commissions: 0.0,
    }
}
