use thiserror::Error;

use crate::utils::time_utils::YearMonth;

/// Recoverable failures of the entry store, the ledger and the comparison set.
#[derive(Debug, Error)]
pub enum DepotError {
    #[error("Depot entry '{0}' not found")]
    EntryNotFound(String),

    #[error("No {field} cell for {year}-{month:02} in depot entry '{entry_id}'")]
    CellNotFound {
        entry_id: String,
        field: String,
        year: i32,
        month: u32,
    },

    #[error("Comparison '{0}' not found")]
    ComparisonNotFound(String),

    #[error("{year}-{month:02} is outside the recorded years of depot entry '{entry_id}'")]
    OutOfRange {
        entry_id: String,
        year: i32,
        month: u32,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("A depot entry named '{0}' already exists")]
    DuplicateName(String),

    #[error("Savings plan section overlaps the existing section {start}..{end}")]
    OverlappingSavingsPlan { start: YearMonth, end: YearMonth },

    #[error("Invalid savings plan section: {0}")]
    InvalidSavingsPlan(String),
}

impl DepotError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DepotError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for the "missing" family (entry, cell, comparison).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DepotError::EntryNotFound(_)
                | DepotError::CellNotFound { .. }
                | DepotError::ComparisonNotFound(_)
        )
    }
}
