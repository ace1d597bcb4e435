//! Net-profit series and equity-curve reconstruction.

use chrono::NaiveDateTime;

use super::error::JournalError;
use super::trade::TradeRecord;

/// Net profit of one closed trade, keyed by its close time.
#[derive(Debug, Clone, PartialEq)]
pub struct NetProfitEntry {
    pub time: NaiveDateTime,
    pub symbol: String,
    pub net_profit: f64,
}

/// Per-trade net profit (`profit + commissions`), ascending by close time.
/// Built fresh per analysis, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NetProfitSeries {
    entries: Vec<NetProfitEntry>,
}

impl NetProfitSeries {
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let mut entries: Vec<NetProfitEntry> = trades
            .iter()
            .map(|t| NetProfitEntry {
                time: t.close_time,
                symbol: t.symbol.clone(),
                net_profit: t.net_profit(),
            })
            .collect();
        // stable: simultaneous closes keep journal order
        entries.sort_by_key(|e| e.time);
        Self { entries }
    }

    /// Subset for one instrument. The symbol must occur in the series.
    pub fn for_symbol(&self, symbol: &str) -> Result<NetProfitSeries, JournalError> {
        let entries: Vec<NetProfitEntry> = self
            .entries
            .iter()
            .filter(|e| e.symbol == symbol)
            .cloned()
            .collect();

        if entries.is_empty() {
            return Err(JournalError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
        Ok(NetProfitSeries { entries })
    }

    pub fn entries(&self) -> &[NetProfitEntry] {
        &self.entries
    }

    pub fn profits(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.net_profit).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.net_profit).sum()
    }

    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.entries.first().map(|e| e.time)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub time: NaiveDateTime,
    pub balance: f64,
}

/// Account balance over time: initial balance plus the running sum of net
/// profit, anchored at the account start. The first point is always the
/// anchor, whose balance equals the initial balance exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub initial_balance: f64,
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// Replay a net-profit series from `account_start` with `initial_balance`.
    ///
    /// A synthetic zero-profit anchor is placed at `account_start`. If a
    /// trade closed at exactly that instant the anchor still sorts first, so
    /// the initial balance reads correctly before any profit lands. The
    /// anchor must not postdate the series' earliest entry.
    pub fn reconstruct(
        series: &NetProfitSeries,
        account_start: NaiveDateTime,
        initial_balance: f64,
    ) -> Result<EquityCurve, JournalError> {
        if let Some(earliest) = series.earliest() {
            if account_start > earliest {
                return Err(JournalError::InvalidAnchor {
                    anchor: account_start,
                    earliest,
                });
            }
        }

        let mut points = Vec::with_capacity(series.len() + 1);
        points.push(EquityPoint {
            time: account_start,
            balance: initial_balance,
        });

        let mut balance = initial_balance;
        for entry in series.entries() {
            balance += entry.net_profit;
            points.push(EquityPoint {
                time: entry.time,
                balance,
            });
        }

        Ok(EquityCurve {
            initial_balance,
            points,
        })
    }

    /// Curve with no trading history: just the configured balance, no points.
    pub fn flat(initial_balance: f64) -> EquityCurve {
        EquityCurve {
            initial_balance,
            points: Vec::new(),
        }
    }

    /// Every point, anchor first.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    /// Trade-indexed view: point `i` is the balance after trade `i + 1`,
    /// anchor excluded. Avoids the off-by-one when callers want "balance
    /// after N trades".
    pub fn trade_points(&self) -> &[EquityPoint] {
        if self.points.is_empty() {
            &self.points
        } else {
            &self.points[1..]
        }
    }

    /// Balance after the `ordinal`-th trade, 1-based.
    pub fn balance_after(&self, ordinal: usize) -> Option<f64> {
        if ordinal == 0 {
            return None;
        }
        self.trade_points().get(ordinal - 1).map(|p| p.balance)
    }

    pub fn final_balance(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.balance)
            .unwrap_or(self.initial_balance)
    }

    /// Balance divided by initial balance at every point. Undefined for a
    /// zero initial balance.
    pub fn net_worth_ratios(&self) -> Option<Vec<f64>> {
        if self.initial_balance == 0.0 {
            return None;
        }
        Some(
            self.points
                .iter()
                .map(|p| p.balance / self.initial_balance)
                .collect(),
        )
    }
}
