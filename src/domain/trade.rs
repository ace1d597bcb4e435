//! Closed-trade journal records.

use chrono::NaiveDateTime;

use super::error::JournalError;

/// Side taken when the position was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Parse a journal `Type` cell. Case-insensitive, surrounding whitespace
    /// ignored. Anything other than buy/sell is unrecognized.
    pub fn parse(value: &str) -> Option<Side> {
        match value.trim().to_lowercase().as_str() {
            "buy" => Some(Side::Buy),
            "sell" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// One closed round-trip position: exactly one open leg and one close leg.
/// Partial fills are not modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub ticket: String,
    pub symbol: String,
    pub side: Side,
    /// Lot size, positive magnitude.
    pub volume: f64,
    pub open_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    pub open_price: f64,
    pub close_price: f64,
    /// Realized P&L excluding commissions.
    pub profit: f64,
    /// Commission charge, signed as exported (a cost is negative).
    pub commissions: f64,
}

impl TradeRecord {
    /// Realized profit with commissions applied.
    pub fn net_profit(&self) -> f64 {
        self.profit + self.commissions
    }

    /// Structural validation of a single record. Fails hard rather than
    /// skipping, so a corrupt journal never yields a partial analysis.
    pub fn validate(&self) -> Result<(), JournalError> {
        if self.volume <= 0.0 {
            return Err(JournalError::MalformedRecord {
                ticket: self.ticket.clone(),
                reason: format!("volume must be positive, got {}", self.volume),
            });
        }
        if self.open_time >= self.close_time {
            return Err(JournalError::MalformedRecord {
                ticket: self.ticket.clone(),
                reason: format!(
                    "open time {} is not before close time {}",
                    self.open_time, self.close_time
                ),
            });
        }
        Ok(())
    }
}
