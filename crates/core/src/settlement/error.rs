//! Settlement error types.

use divvy_shared::AppError;
use divvy_shared::types::{Money, MoneyError, UserId};
use thiserror::Error;

/// Errors that can occur while planning a settlement.
///
/// None of these are caused by user input when balances were aggregated from
/// reconciled expenses; they indicate corrupted upstream data.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Credits and debits do not cancel out.
    #[error("Settlement inconsistency: credits ({credits}) != debits ({debits})")]
    Inconsistency {
        /// Sum of positive balances.
        credits: Money,
        /// Sum of the magnitudes of negative balances.
        debits: Money,
    },

    /// The same user appears more than once in the balance set.
    #[error("User {0} appears more than once in the balance set")]
    DuplicateBalance(UserId),

    /// A transfer names a user outside the balance set.
    #[error("Transfer references unknown user {0}")]
    UnknownParticipant(UserId),

    /// Totals overflowed.
    #[error("Settlement arithmetic failed: {0}")]
    Arithmetic(#[from] MoneyError),
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Inconsistency { .. } => "SETTLEMENT_INCONSISTENCY",
            Self::DuplicateBalance(_) => "DUPLICATE_BALANCE",
            Self::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
            Self::Arithmetic(_) => "SETTLEMENT_ARITHMETIC_ERROR",
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        Self::Internal(err.to_string())
    }
}
