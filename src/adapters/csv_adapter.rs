//! CSV journal adapter reading broker trading-journal exports.
//!
//! The expected shape is the FTMO MatriX export: semicolon-separated with
//! columns `Ticket;Open;Close;Type;Volume;Symbol;Price;Price.1;Profit;
//! Commissions`. Columns are located by header name, so extra columns and
//! reordering are harmless; a missing header is a fatal schema error.

use crate::domain::error::JournalError;
use crate::domain::trade::{Side, TradeRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::journal_port::JournalPort;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

const COL_TICKET: &str = "Ticket";
const COL_OPEN: &str = "Open";
const COL_CLOSE: &str = "Close";
const COL_TYPE: &str = "Type";
const COL_VOLUME: &str = "Volume";
const COL_SYMBOL: &str = "Symbol";
const COL_OPEN_PRICE: &str = "Price";
const COL_CLOSE_PRICE: &str = "Price.1";
const COL_PROFIT: &str = "Profit";
const COL_COMMISSIONS: &str = "Commissions";

pub const DEFAULT_DELIMITER: u8 = b';';

pub struct CsvJournalAdapter {
    path: PathBuf,
    delimiter: u8,
}

struct ColumnMap {
    ticket: usize,
    open: usize,
    close: usize,
    side: usize,
    volume: usize,
    symbol: usize,
    open_price: usize,
    close_price: usize,
    profit: usize,
    commissions: usize,
}

impl CsvJournalAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(path: PathBuf, delimiter: u8) -> Self {
        Self { path, delimiter }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        let path = config.get_string("journal", "path").ok_or_else(|| {
            JournalError::ConfigMissing {
                section: "journal".to_string(),
                key: "path".to_string(),
            }
        })?;
        let delimiter = match config.get_string("journal", "delimiter") {
            Some(s) if s.len() == 1 => s.as_bytes()[0],
            Some(s) => {
                return Err(JournalError::ConfigInvalid {
                    section: "journal".to_string(),
                    key: "delimiter".to_string(),
                    reason: format!("delimiter must be a single character, got {:?}", s),
                });
            }
            None => DEFAULT_DELIMITER,
        };
        Ok(Self::with_delimiter(PathBuf::from(path), delimiter))
    }

    fn map_columns(headers: &csv::StringRecord) -> Result<ColumnMap, JournalError> {
        let index = |name: &str| -> Result<usize, JournalError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| JournalError::SchemaMismatch {
                    reason: format!("missing column {:?}", name),
                })
        };

        Ok(ColumnMap {
            ticket: index(COL_TICKET)?,
            open: index(COL_OPEN)?,
            close: index(COL_CLOSE)?,
            side: index(COL_TYPE)?,
            volume: index(COL_VOLUME)?,
            symbol: index(COL_SYMBOL)?,
            open_price: index(COL_OPEN_PRICE)?,
            close_price: index(COL_CLOSE_PRICE)?,
            profit: index(COL_PROFIT)?,
            commissions: index(COL_COMMISSIONS)?,
        })
    }

    fn parse_record(
        record: &csv::StringRecord,
        columns: &ColumnMap,
    ) -> Result<TradeRecord, JournalError> {
        let cell = |i: usize| record.get(i).unwrap_or("").trim();
        let ticket = cell(columns.ticket).to_string();

        let malformed = |reason: String| JournalError::MalformedRecord {
            ticket: ticket.clone(),
            reason,
        };

        let side = Side::parse(cell(columns.side))
            .ok_or_else(|| malformed(format!("unknown side: {:?}", cell(columns.side))))?;

        let number = |i: usize, name: &str| -> Result<f64, JournalError> {
            cell(i)
                .parse::<f64>()
                .map_err(|_| malformed(format!("invalid {} value: {:?}", name, cell(i))))
        };

        Ok(TradeRecord {
            ticket: ticket.clone(),
            symbol: cell(columns.symbol).to_string(),
            side,
            volume: number(columns.volume, "volume")?,
            open_time: parse_time(cell(columns.open))
                .map_err(|reason| malformed(reason))?,
            close_time: parse_time(cell(columns.close))
                .map_err(|reason| malformed(reason))?,
            open_price: number(columns.open_price, "open price")?,
            close_price: number(columns.close_price, "close price")?,
            profit: number(columns.profit, "profit")?,
            commissions: number(columns.commissions, "commissions")?,
        })
    }
}

/// Journal timestamps come with or without seconds depending on the export.
fn parse_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .map_err(|_| format!("invalid timestamp: {:?}", value))
}

impl JournalPort for CsvJournalAdapter {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, JournalError> {
        let content = fs::read_to_string(&self.path).map_err(|e| JournalError::Io {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| JournalError::SchemaMismatch {
                reason: format!("unreadable header row: {}", e),
            })?
            .clone();
        let columns = Self::map_columns(&headers)?;

        let mut trades = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| JournalError::SchemaMismatch {
                reason: format!("CSV parse error: {}", e),
            })?;
            trades.push(Self::parse_record(&record, &columns)?);
        }

        Ok(trades)
    }

    fn list_symbols(&self) -> Result<Vec<String>, JournalError> {
        let trades = self.fetch_trades()?;
        let symbols: BTreeSet<String> = trades.into_iter().map(|t| t.symbol).collect();
        Ok(symbols.into_iter().collect())
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID_JOURNAL: &str = "\
Ticket;Open;Close;Type;Volume;Symbol;Price;Price.1;Profit;Commissions\n\
1001;2024-03-04 09:30:00;2024-03-04 14:45:00;buy;1.5;EURUSD;1.0850;1.0900;750.00;-9.00\n\
1002;2024-03-05 10:00:00;2024-03-05 11:30:00;sell;0.5;XAUUSD;2150.00;2155.00;-250.00;-3.00\n";

    fn write_journal(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn fetch_trades_maps_all_columns() {
        let (_dir, path) = write_journal(VALID_JOURNAL);
        let adapter = CsvJournalAdapter::new(path);

        let trades = adapter.fetch_trades().unwrap();
        assert_eq!(trades.len(), 2);

        let first = &trades[0];
        assert_eq!(first.ticket, "1001");
        assert_eq!(first.symbol, "EURUSD");
        assert_eq!(first.side, Side::Buy);
        assert!((first.volume - 1.5).abs() < f64::EPSILON);
        assert!((first.open_price - 1.0850).abs() < f64::EPSILON);
        assert!((first.close_price - 1.0900).abs() < f64::EPSILON);
        assert!((first.profit - 750.0).abs() < f64::EPSILON);
        assert!((first.commissions - (-9.0)).abs() < f64::EPSILON);
        assert_eq!(trades[1].side, Side::Sell);
    }

    #[test]
    fn reordered_columns_still_map() {
        let (_dir, path) = write_journal(
            "Symbol;Ticket;Type;Volume;Open;Close;Price;Price.1;Profit;Commissions\n\
             EURUSD;7;buy;1.0;2024-01-01 09:00:00;2024-01-01 10:00:00;1.1;1.2;10.0;-1.0\n",
        );
        let adapter = CsvJournalAdapter::new(path);

        let trades = adapter.fetch_trades().unwrap();
        assert_eq!(trades[0].ticket, "7");
        assert_eq!(trades[0].symbol, "EURUSD");
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let (_dir, path) = write_journal(
            "Ticket;Open;Close;Type;Volume;Symbol;Price;Profit;Commissions\n\
             1;2024-01-01 09:00:00;2024-01-01 10:00:00;buy;1.0;EURUSD;1.1;10.0;-1.0\n",
        );
        let adapter = CsvJournalAdapter::new(path);

        let err = adapter.fetch_trades().unwrap_err();
        assert!(
            matches!(err, JournalError::SchemaMismatch { reason } if reason.contains("Price.1"))
        );
    }

    #[test]
    fn unknown_side_is_malformed_record() {
        let (_dir, path) = write_journal(
            "Ticket;Open;Close;Type;Volume;Symbol;Price;Price.1;Profit;Commissions\n\
             9;2024-01-01 09:00:00;2024-01-01 10:00:00;hold;1.0;EURUSD;1.1;1.2;10.0;-1.0\n",
        );
        let adapter = CsvJournalAdapter::new(path);

        let err = adapter.fetch_trades().unwrap_err();
        assert!(matches!(err, JournalError::MalformedRecord { ticket, .. } if ticket == "9"));
    }

    #[test]
    fn bad_number_is_malformed_record() {
        let (_dir, path) = write_journal(
            "Ticket;Open;Close;Type;Volume;Symbol;Price;Price.1;Profit;Commissions\n\
             9;2024-01-01 09:00:00;2024-01-01 10:00:00;buy;a lot;EURUSD;1.1;1.2;10.0;-1.0\n",
        );
        let adapter = CsvJournalAdapter::new(path);

        let err = adapter.fetch_trades().unwrap_err();
        assert!(
            matches!(err, JournalError::MalformedRecord { reason, .. } if reason.contains("volume"))
        );
    }

    #[test]
    fn minute_precision_timestamps_accepted() {
        let (_dir, path) = write_journal(
            "Ticket;Open;Close;Type;Volume;Symbol;Price;Price.1;Profit;Commissions\n\
             1;2024-01-01 09:00;2024-01-01 10:30;buy;1.0;EURUSD;1.1;1.2;10.0;-1.0\n",
        );
        let adapter = CsvJournalAdapter::new(path);

        let trades = adapter.fetch_trades().unwrap();
        assert_eq!(
            trades[0].close_time,
            NaiveDateTime::parse_from_str("2024-01-01 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
    }

    #[test]
    fn comma_delimiter_via_config() {
        let (_dir, path) = write_journal(
            "Ticket,Open,Close,Type,Volume,Symbol,Price,Price.1,Profit,Commissions\n\
             1,2024-01-01 09:00:00,2024-01-01 10:00:00,buy,1.0,EURUSD,1.1,1.2,10.0,-1.0\n",
        );
        let adapter = CsvJournalAdapter::with_delimiter(path, b',');

        let trades = adapter.fetch_trades().unwrap();
        assert_eq!(trades.len(), 1);
    }

    #[test]
    fn list_symbols_is_sorted_and_distinct() {
        let (_dir, path) = write_journal(
            "Ticket;Open;Close;Type;Volume;Symbol;Price;Price.1;Profit;Commissions\n\
             1;2024-01-01 09:00:00;2024-01-01 10:00:00;buy;1.0;XAUUSD;1.1;1.2;10.0;-1.0\n\
             2;2024-01-02 09:00:00;2024-01-02 10:00:00;buy;1.0;EURUSD;1.1;1.2;10.0;-1.0\n\
             3;2024-01-03 09:00:00;2024-01-03 10:00:00;buy;1.0;XAUUSD;1.1;1.2;10.0;-1.0\n",
        );
        let adapter = CsvJournalAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["EURUSD", "XAUUSD"]);
    }

    #[test]
    fn data_range_spans_journal() {
        let (_dir, path) = write_journal(VALID_JOURNAL);
        let adapter = CsvJournalAdapter::new(path);

        let (first_open, last_close, count) = adapter.data_range().unwrap().unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            first_open,
            NaiveDateTime::parse_from_str("2024-03-04 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
        assert_eq!(
            last_close,
            NaiveDateTime::parse_from_str("2024-03-05 11:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let adapter = CsvJournalAdapter::new(PathBuf::from("/nonexistent/journal.csv"));
        let err = adapter.fetch_trades().unwrap_err();
        assert!(matches!(err, JournalError::Io { .. }));
    }
}
