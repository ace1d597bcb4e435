//! Per-symbol order series and the combined wide table.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

use super::error::JournalError;
use super::order::OrderEvent;

/// One row of a symbol's order series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub time: NaiveDateTime,
    pub price: f64,
    pub signed_size: f64,
    pub fixed_fee: f64,
}

/// Time-ordered, timestamp-deduplicated order series for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSeries {
    pub symbol: String,
    pub entries: Vec<SeriesEntry>,
}

impl SymbolSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group flattened order events into one series per symbol, each sorted
/// ascending by time.
///
/// Two legs landing on the identical instant for one symbol collapse to a
/// single entry: the later leg in flattening order is kept, so a close leg
/// beats an open leg at the same timestamp. Closes carry the fee and are
/// semantically posterior, which makes the kept entry deterministic across
/// runs on identical input.
pub fn build_symbol_series(events: &[OrderEvent]) -> BTreeMap<String, SymbolSeries> {
    let mut grouped: BTreeMap<String, Vec<SeriesEntry>> = BTreeMap::new();

    for event in events {
        grouped
            .entry(event.symbol.clone())
            .or_default()
            .push(SeriesEntry {
                time: event.time,
                price: event.price,
                signed_size: event.signed_size,
                fixed_fee: event.fixed_fee,
            });
    }

    grouped
        .into_iter()
        .map(|(symbol, mut entries)| {
            // stable sort keeps flattening order within a timestamp tie
            entries.sort_by_key(|e| e.time);
            let entries = dedup_keep_last(entries);
            (symbol.clone(), SymbolSeries { symbol, entries })
        })
        .collect()
}

fn dedup_keep_last(entries: Vec<SeriesEntry>) -> Vec<SeriesEntry> {
    let mut deduped: Vec<SeriesEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match deduped.last() {
            Some(last) if last.time == entry.time => {
                *deduped.last_mut().unwrap() = entry;
            }
            _ => deduped.push(entry),
        }
    }
    deduped
}

/// Restrict a series set to the named symbols. An empty allow-list selects
/// everything. Requesting a symbol absent from the input is an error, not a
/// silent empty result.
pub fn filter_symbols(
    series: &BTreeMap<String, SymbolSeries>,
    allow: &[String],
) -> Result<BTreeMap<String, SymbolSeries>, JournalError> {
    if allow.is_empty() {
        return Ok(series.clone());
    }

    let mut filtered = BTreeMap::new();
    for symbol in allow {
        match series.get(symbol) {
            Some(s) => {
                filtered.insert(symbol.clone(), s.clone());
            }
            None => {
                return Err(JournalError::UnknownSymbol {
                    symbol: symbol.clone(),
                });
            }
        }
    }
    Ok(filtered)
}

/// Wide table over the union of all selected symbols' timestamps, one
/// column per symbol, one grid per measure. A `None` cell means "no order at
/// this instant for this symbol" — distinct from an order of size zero, so a
/// downstream replay engine can tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub symbols: Vec<String>,
    pub times: Vec<NaiveDateTime>,
    /// Indexed `[row][column]`, rows aligned with `times`, columns with `symbols`.
    pub price: Vec<Vec<Option<f64>>>,
    pub size: Vec<Vec<Option<f64>>>,
    pub fee: Vec<Vec<Option<f64>>>,
}

/// Align a series set on a shared time axis.
pub fn combine_series(series: &BTreeMap<String, SymbolSeries>) -> CombinedTable {
    let symbols: Vec<String> = series.keys().cloned().collect();

    let times: Vec<NaiveDateTime> = series
        .values()
        .flat_map(|s| s.entries.iter().map(|e| e.time))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut price = vec![vec![None; symbols.len()]; times.len()];
    let mut size = vec![vec![None; symbols.len()]; times.len()];
    let mut fee = vec![vec![None; symbols.len()]; times.len()];

    for (col, symbol) in symbols.iter().enumerate() {
        for entry in &series[symbol].entries {
            let row = times.binary_search(&entry.time).expect("time in union");
            price[row][col] = Some(entry.price);
            size[row][col] = Some(entry.signed_size);
            fee[row][col] = Some(entry.fixed_fee);
        }
    }

    CombinedTable {
        symbols,
        times,
        price,
        size,
        fee,
    }
}

/// A resolved order table ready for a downstream replay engine: either one
/// symbol's series, or every selected symbol aligned on a shared time axis.
/// One interface, two variants — callers never branch on symbol count twice.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderTable {
    Single(SymbolSeries),
    Combined(CombinedTable),
}

impl OrderTable {
    pub fn symbols(&self) -> Vec<&str> {
        match self {
            OrderTable::Single(s) => vec![s.symbol.as_str()],
            OrderTable::Combined(t) => t.symbols.iter().map(String::as_str).collect(),
        }
    }

    pub fn times(&self) -> Vec<NaiveDateTime> {
        match self {
            OrderTable::Single(s) => s.entries.iter().map(|e| e.time).collect(),
            OrderTable::Combined(t) => t.times.clone(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            OrderTable::Single(s) => s.entries.len(),
            OrderTable::Combined(t) => t.times.len(),
        }
    }
}

/// Apply the symbol filter and pick the table shape: a lone selected symbol
/// yields its series directly, anything else (or `combine = true`) yields
/// the wide table.
pub fn select_order_table(
    series: &BTreeMap<String, SymbolSeries>,
    allow: &[String],
    combine: bool,
) -> Result<OrderTable, JournalError> {
    let filtered = filter_symbols(series, allow)?;

    if !combine && filtered.len() == 1 {
        let single = filtered.into_values().next().unwrap();
        return Ok(OrderTable::Single(single));
    }

    Ok(OrderTable::Combined(combine_series(&filtered)))
}
