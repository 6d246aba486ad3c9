//! Expense calculator: the single entry point for splitting an expense.

use divvy_shared::types::Money;
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{ParticipantInput, SplitMethod, SplitRequest, SplitResult};

/// Expense calculator.
///
/// Pure dispatch over [`SplitMethod`] with no side effects. All failures are
/// reported as [`SplitError`], so callers handle one error family.
pub struct ExpenseCalculator;

impl ExpenseCalculator {
    /// Calculate expense shares for a split method given by name.
    ///
    /// # Arguments
    ///
    /// * `method` - `"equal"`, `"exact"` or `"percentage"`
    /// * `total_amount` - Total expense amount, at most two decimal places
    /// * `participants` - Participant inputs in canonical order
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidSplitMethod` for an unknown method,
    /// `SplitError::InvalidAmount` for a total with sub-cent digits, and
    /// whatever the selected method reports, unchanged.
    pub fn calculate_shares(
        method: &str,
        total_amount: Decimal,
        participants: &[ParticipantInput],
    ) -> Result<SplitResult, SplitError> {
        let method: SplitMethod = method.parse()?;
        let total_amount = Self::to_money(total_amount)?;
        method.split(total_amount, participants)
    }

    /// Calculate expense shares for a typed request.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the request's split method.
    pub fn calculate(request: &SplitRequest) -> Result<SplitResult, SplitError> {
        request
            .method
            .split(request.total_amount, &request.participants)
    }

    /// Parse a caller-supplied total amount literal.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidAmount` if the literal is malformed, not
    /// positive, or has more than two decimal places.
    pub fn parse_total(literal: &str) -> Result<Money, SplitError> {
        let amount: Decimal = literal.trim().parse().map_err(|_| {
            SplitError::InvalidAmount(format!("invalid expense amount format: {literal:?}"))
        })?;
        let total = Self::to_money(amount)?;
        if !total.is_positive() {
            return Err(SplitError::InvalidAmount(format!(
                "expense amount must be positive, got {total}"
            )));
        }
        Ok(total)
    }

    fn to_money(amount: Decimal) -> Result<Money, SplitError> {
        if !Money::is_cent_exact(amount) {
            return Err(SplitError::InvalidAmount(format!(
                "expense amount {amount} has more than two decimal places"
            )));
        }
        Money::from_decimal(amount).map_err(|e| {
            tracing::error!(%amount, error = %e, "expense total out of range");
            SplitError::calculation("expense total", e)
        })
    }
}
