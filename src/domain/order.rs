//! Flattening closed trades into discrete order events.

use chrono::NaiveDateTime;

use super::error::JournalError;
use super::trade::{Side, TradeRecord};

/// One atomic transaction on the account at a single instant.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub symbol: String,
    pub time: NaiveDateTime,
    /// Positive = buy, negative = sell, magnitude = lot size.
    pub signed_size: f64,
    pub price: f64,
    /// Cost attributed to this single event.
    pub fixed_fee: f64,
}

/// Expand each closed trade into its open and close legs.
///
/// The open leg carries zero fee and the trade's side as its sign; the close
/// leg carries the whole commission and the opposite sign, since closing a
/// position reverses it. Output preserves flattening order (open then close
/// per input trade) and is not time-sorted; ordering is the series builder's
/// job.
pub fn flatten_trades(trades: &[TradeRecord]) -> Result<Vec<OrderEvent>, JournalError> {
    let mut events = Vec::with_capacity(trades.len() * 2);

    for trade in trades {
        trade.validate()?;

        let open_size = match trade.side {
            Side::Buy => trade.volume,
            Side::Sell => -trade.volume,
        };

        events.push(OrderEvent {
            symbol: trade.symbol.clone(),
            time: trade.open_time,
            signed_size: open_size,
            price: trade.open_price,
            fixed_fee: 0.0,
        });
        events.push(OrderEvent {
            symbol: trade.symbol.clone(),
            time: trade.close_time,
            signed_size: -open_size,
            price: trade.close_price,
            fixed_fee: trade.commissions,
        });
    }

    Ok(events)
}
