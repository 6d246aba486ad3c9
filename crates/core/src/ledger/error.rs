//! Ledger error types.

use divvy_shared::AppError;
use divvy_shared::types::UserId;
use thiserror::Error;

use crate::balance::BalanceError;
use crate::settlement::SettlementError;
use crate::split::SplitError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Creator or participant is not a known user.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// Expense description is blank.
    #[error("Expense description cannot be empty")]
    EmptyDescription,

    /// Share calculation failed.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Balance aggregation failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Settlement planning failed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::Split(err) => err.error_code(),
            Self::Balance(err) => err.error_code(),
            Self::Settlement(err) => err.error_code(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UserNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::EmptyDescription => Self::Validation(err.to_string()),
            LedgerError::Split(err) => err.into(),
            LedgerError::Balance(err) => err.into(),
            LedgerError::Settlement(err) => err.into(),
        }
    }
}
