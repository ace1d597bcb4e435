//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for journalyzer.
///
/// Statistic denominators that come out zero are not errors: those surface
/// as `None` on the affected statistic so the rest of the report survives.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JournalError {
    #[error("malformed trade record {ticket}: {reason}")]
    MalformedRecord { ticket: String, reason: String },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("account start {anchor} is after the first journal entry at {earliest}")]
    InvalidAnchor {
        anchor: NaiveDateTime,
        earliest: NaiveDateTime,
    },

    #[error("journal schema mismatch: {reason}")]
    SchemaMismatch { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("io error: {reason}")]
    Io { reason: String },
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io { .. } => 1,
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. } => 2,
            JournalError::SchemaMismatch { .. } => 3,
            JournalError::MalformedRecord { .. } => 4,
            JournalError::UnknownSymbol { .. } | JournalError::InvalidAnchor { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
