//! Configuration validation.
//!
//! Validates every config field up front so a bad value fails before any
//! journal work starts.

use crate::domain::daily::DateOrder;
use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_journal_path(config)?;
    validate_delimiter(config)?;
    validate_initial_balance(config)?;
    validate_account_start(config)?;
    validate_analysis_range(config)?;
    validate_date_order(config)?;
    Ok(())
}

fn validate_journal_path(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("journal", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(JournalError::ConfigMissing {
            section: "journal".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_delimiter(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("journal", "delimiter") {
        None => Ok(()),
        Some(s) if s.len() == 1 => Ok(()),
        Some(s) => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "delimiter".to_string(),
            reason: format!("delimiter must be a single character, got {:?}", s),
        }),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let value = config.get_double("account", "initial_balance", 0.0);
    if value < 0.0 {
        return Err(JournalError::ConfigInvalid {
            section: "account".to_string(),
            key: "initial_balance".to_string(),
            reason: "initial_balance must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_account_start(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("account", "start_date") {
        None => Ok(()),
        Some(s) => parse_date(&s, "account", "start_date").map(|_| ()),
    }
}

fn validate_analysis_range(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let start = match config.get_string("analysis", "start_date") {
        Some(s) => Some(parse_date(&s, "analysis", "start_date")?),
        None => None,
    };
    let end = match config.get_string("analysis", "end_date") {
        Some(s) => Some(parse_date(&s, "analysis", "end_date")?),
        None => None,
    };

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(JournalError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_date_order(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("analysis", "date_order") {
        None => Ok(()),
        Some(s) => match DateOrder::parse(&s) {
            Some(_) => Ok(()),
            None => Err(JournalError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "date_order".to_string(),
                reason: format!("expected ascending or descending, got {:?}", s),
            }),
        },
    }
}

pub fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| JournalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("invalid {} format, expected YYYY-MM-DD", key),
    })
}
