//! Report generation port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::JournalError;

/// Port for writing analysis reports.
pub trait ReportPort {
    fn write(&self, result: &AnalysisResult, output_path: &str) -> Result<(), JournalError>;
}
