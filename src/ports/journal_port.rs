//! Journal access port trait.

use crate::domain::error::JournalError;
use crate::domain::trade::TradeRecord;
use chrono::NaiveDateTime;

/// Source of closed-trade records. Adapters load the whole journal; all
/// filtering is domain work so every source behaves identically.
pub trait JournalPort {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, JournalError>;

    /// Distinct symbols present in the journal, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, JournalError>;

    /// Earliest open time, latest close time and record count, or `None`
    /// for an empty journal.
    fn data_range(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, JournalError>;
}
