//! Money type with fixed-point cent precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as an integer number of cents; `rust_decimal::Decimal`
//! is only used at the edges (parsing, percentages, display).

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places carried by every `Money` value.
pub const MINOR_UNIT_SCALE: u32 = 2;

const CENTS_PER_UNIT: i64 = 100;

/// Errors produced by money arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoneyError {
    /// Result does not fit in the cent representation.
    #[error("Money arithmetic overflow")]
    Overflow,

    /// Division by a zero count.
    #[error("Cannot divide money by zero")]
    DivideByZero,

    /// Amount has digits below the cent.
    #[error("Amount {0} has more than two decimal places")]
    SubCent(Decimal),

    /// Input is not a valid decimal literal.
    #[error("Invalid money literal: {0}")]
    Parse(#[from] rust_decimal::Error),
}

/// A signed monetary amount in cents.
///
/// Serialized as a decimal string with two places (e.g. `"33.34"`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a decimal amount, rounding half-up (ties away from zero) to the cent.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the amount does not fit in `i64` cents.
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        let rounded =
            amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::from(CENTS_PER_UNIT))
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Returns true if `amount` has no digits below the cent.
    #[must_use]
    pub fn is_cent_exact(amount: Decimal) -> bool {
        amount.round_dp(MINOR_UNIT_SCALE) == amount
    }

    /// Returns the amount as a decimal with two places.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the magnitude of the amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` for `i64::MIN` cents.
    pub fn abs(self) -> Result<Self, MoneyError> {
        self.0.checked_abs().map(Self).ok_or(MoneyError::Overflow)
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` on overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` on overflow.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiplies by an integer count.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` on overflow.
    pub fn checked_mul_count(self, count: usize) -> Result<Self, MoneyError> {
        i64::try_from(count)
            .ok()
            .and_then(|count| self.0.checked_mul(count))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Divides by a count, rounding half-up to the cent.
    ///
    /// `Money::from_cents(10_000).div_round(3)` is `33.33`; `0.05 / 6` is `0.01`.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::DivideByZero` if `count` is zero.
    pub fn div_round(self, count: usize) -> Result<Self, MoneyError> {
        if count == 0 {
            return Err(MoneyError::DivideByZero);
        }
        let divisor = u64::try_from(count).map_err(|_| MoneyError::Overflow)?;
        let exact = self
            .to_decimal()
            .checked_div(Decimal::from(divisor))
            .ok_or(MoneyError::Overflow)?;
        Self::from_decimal(exact)
    }

    /// Takes `percentage` percent of the amount, rounding half-up to the cent.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` on overflow.
    pub fn percent(self, percentage: Decimal) -> Result<Self, MoneyError> {
        let exact = percentage
            .checked_mul(self.to_decimal())
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(MoneyError::Overflow)?;
        Self::from_decimal(exact)
    }

    /// Sums amounts, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    /// Strict conversion: sub-cent digits are an error, never rounded.
    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if !Self::is_cent_exact(amount) {
            return Err(MoneyError::SubCent(amount));
        }
        Self::from_decimal(amount)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())?;
        Self::from_decimal(amount)
    }
}
