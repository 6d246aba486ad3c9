//! Balance error types.

use divvy_shared::AppError;
use divvy_shared::types::{MoneyError, UserId};
use thiserror::Error;

/// Errors that can occur while aggregating balances.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Balance requested for a user that does not exist.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// Totals overflowed.
    #[error("Balance arithmetic failed: {0}")]
    Arithmetic(#[from] MoneyError),
}

impl BalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Arithmetic(_) => "BALANCE_ARITHMETIC_ERROR",
        }
    }
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::UserNotFound(_) => Self::NotFound(err.to_string()),
            BalanceError::Arithmetic(_) => Self::Internal(err.to_string()),
        }
    }
}
