//! Split error types.

use divvy_shared::AppError;
use divvy_shared::types::MoneyError;
use thiserror::Error;

/// Errors that can occur while splitting an expense.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Total or declared share is non-positive, malformed, or does not reconcile.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Participant data is empty, duplicated, or inconsistent.
    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),

    /// Split method is not one of `equal`, `exact`, `percentage`.
    #[error("Invalid split method: {0}")]
    InvalidSplitMethod(String),

    /// Arithmetic or parsing failure while computing shares.
    #[error("Error calculating {context}: {source}")]
    Calculation {
        /// What was being computed.
        context: String,
        /// Underlying cause.
        #[source]
        source: MoneyError,
    },
}

impl SplitError {
    /// Wraps a money failure with the computation it interrupted.
    pub(crate) fn calculation(context: impl Into<String>, source: MoneyError) -> Self {
        Self::Calculation {
            context: context.into(),
            source,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidParticipants(_) => "INVALID_PARTICIPANTS",
            Self::InvalidSplitMethod(_) => "INVALID_SPLIT_METHOD",
            Self::Calculation { .. } => "EXPENSE_CALCULATION_ERROR",
        }
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::Calculation { .. } => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SplitError::InvalidAmount(String::new()).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            SplitError::InvalidParticipants(String::new()).error_code(),
            "INVALID_PARTICIPANTS"
        );
        assert_eq!(
            SplitError::InvalidSplitMethod(String::new()).error_code(),
            "INVALID_SPLIT_METHOD"
        );
        assert_eq!(
            SplitError::calculation("equal shares", MoneyError::Overflow).error_code(),
            "EXPENSE_CALCULATION_ERROR"
        );
    }

    #[test]
    fn test_calculation_keeps_source() {
        let err = SplitError::calculation("equal shares", MoneyError::Overflow);
        assert_eq!(
            err.to_string(),
            "Error calculating equal shares: Money arithmetic overflow"
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Money arithmetic overflow");
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = SplitError::InvalidSplitMethod("weighted".into()).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = SplitError::calculation("x", MoneyError::Overflow).into();
        assert_eq!(app.status_code(), 500);
    }
}
