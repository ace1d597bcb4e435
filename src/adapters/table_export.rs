//! CSV export of order tables for a downstream replay engine.
//!
//! The contract is one time-indexed row per order instant with
//! `close price`, `signed size` and `fixed fee` columns — per symbol for a
//! single table, measure-grouped symbol columns for a combined one. Unset
//! cells in a combined table stay empty so the consumer can distinguish
//! "no order" from an order of size zero.

use crate::domain::error::JournalError;
use crate::domain::series::{CombinedTable, OrderTable, SymbolSeries};
use chrono::NaiveDateTime;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn write_order_table(table: &OrderTable, path: &Path) -> Result<(), JournalError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| JournalError::Io {
        reason: format!("failed to open {}: {}", path.display(), e),
    })?;

    match table {
        OrderTable::Single(series) => write_single(&mut writer, series)?,
        OrderTable::Combined(combined) => write_combined(&mut writer, combined)?,
    }

    writer.flush().map_err(|e| JournalError::Io {
        reason: format!("failed to write {}: {}", path.display(), e),
    })
}

fn write_single<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    series: &SymbolSeries,
) -> Result<(), JournalError> {
    write_row(
        writer,
        vec![
            "time".to_string(),
            "close price".to_string(),
            "signed size".to_string(),
            "fixed fee".to_string(),
        ],
    )?;

    for entry in &series.entries {
        write_row(
            writer,
            vec![
                format_time(entry.time),
                entry.price.to_string(),
                entry.signed_size.to_string(),
                entry.fixed_fee.to_string(),
            ],
        )?;
    }
    Ok(())
}

fn write_combined<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    table: &CombinedTable,
) -> Result<(), JournalError> {
    let mut header = vec!["time".to_string()];
    for (measure, _) in measures(table) {
        for symbol in &table.symbols {
            header.push(format!("{} {}", symbol, measure));
        }
    }
    write_row(writer, header)?;

    for (row, &time) in table.times.iter().enumerate() {
        let mut cells = vec![format_time(time)];
        for (_, grid) in measures(table) {
            for col in 0..table.symbols.len() {
                cells.push(match grid[row][col] {
                    Some(value) => value.to_string(),
                    None => String::new(),
                });
            }
        }
        write_row(writer, cells)?;
    }
    Ok(())
}

fn measures(table: &CombinedTable) -> [(&'static str, &Vec<Vec<Option<f64>>>); 3] {
    [
        ("close price", &table.price),
        ("signed size", &table.size),
        ("fixed fee", &table.fee),
    ]
}

fn format_time(time: NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn write_row<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    cells: Vec<String>,
) -> Result<(), JournalError> {
    writer.write_record(&cells).map_err(|e| JournalError::Io {
        reason: format!("CSV write error: {}", e),
    })
}
