//! Share computation for each split method.
//!
//! Every method guarantees that the computed shares sum to the total exactly.
//! Equal and percentage splits round each share half-up to the cent and hand
//! the rounding residual to one deterministically chosen participant; exact
//! splits never adjust anything.

use std::collections::HashSet;

use divvy_shared::types::{Money, MoneyError};
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{ParticipantInput, ParticipantShare, SplitMethod, SplitResult};

impl SplitMethod {
    /// Splits `total_amount` among `participants`.
    ///
    /// Participant order matters: it decides who absorbs rounding residuals.
    ///
    /// # Errors
    ///
    /// - `SplitError::InvalidAmount` if the total is not positive, or exact shares
    ///   are negative or do not add up to the total
    /// - `SplitError::InvalidParticipants` if the list is empty, has duplicates,
    ///   lacks the declared values the method needs, or percentages do not sum to 100
    /// - `SplitError::Calculation` on arithmetic overflow
    pub fn split(
        self,
        total_amount: Money,
        participants: &[ParticipantInput],
    ) -> Result<SplitResult, SplitError> {
        validate_amount(total_amount)?;
        validate_participants(participants)?;

        let shares = match self {
            Self::Equal => split_equal(total_amount, participants),
            Self::Exact => split_exact(total_amount, participants),
            Self::Percentage => split_percentage(total_amount, participants),
        }
        .map_err(|e| match e {
            StrategyFailure::Rejected(err) => err,
            StrategyFailure::Arithmetic(source) => {
                tracing::error!(
                    method = %self,
                    total = %total_amount,
                    error = %source,
                    "share arithmetic failed"
                );
                SplitError::calculation(format!("{self} shares"), source)
            }
        })?;

        debug_assert_eq!(
            Money::checked_sum(shares.iter().map(|s| s.share)).ok(),
            Some(total_amount)
        );
        tracing::debug!(
            method = %self,
            total = %total_amount,
            participants = shares.len(),
            "split expense"
        );

        Ok(SplitResult {
            method: self,
            total_amount,
            shares,
        })
    }
}

/// Internal failure of a strategy before it is mapped to a `SplitError`.
enum StrategyFailure {
    Rejected(SplitError),
    Arithmetic(MoneyError),
}

impl From<MoneyError> for StrategyFailure {
    fn from(err: MoneyError) -> Self {
        Self::Arithmetic(err)
    }
}

impl From<SplitError> for StrategyFailure {
    fn from(err: SplitError) -> Self {
        Self::Rejected(err)
    }
}

fn validate_amount(total_amount: Money) -> Result<(), SplitError> {
    if !total_amount.is_positive() {
        return Err(SplitError::InvalidAmount(format!(
            "expense amount must be positive, got {total_amount}"
        )));
    }
    Ok(())
}

fn validate_participants(participants: &[ParticipantInput]) -> Result<(), SplitError> {
    if participants.is_empty() {
        return Err(SplitError::InvalidParticipants(
            "no participants provided".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.user_id) {
            return Err(SplitError::InvalidParticipants(format!(
                "user {} is listed more than once",
                participant.user_id
            )));
        }
    }
    Ok(())
}

/// Adds `total - sum(shares)` to the share at `index`.
fn absorb_residual(
    shares: &mut [ParticipantShare],
    total_amount: Money,
    index: usize,
) -> Result<(), MoneyError> {
    let allocated = Money::checked_sum(shares.iter().map(|s| s.share))?;
    let residual = total_amount.checked_sub(allocated)?;
    if !residual.is_zero() {
        let absorber = &mut shares[index];
        absorber.share = absorber.share.checked_add(residual)?;
    }
    Ok(())
}

/// Equal split. The first participant absorbs the residual.
fn split_equal(
    total_amount: Money,
    participants: &[ParticipantInput],
) -> Result<Vec<ParticipantShare>, StrategyFailure> {
    let share = total_amount.div_round(participants.len())?;

    let mut shares: Vec<ParticipantShare> = participants
        .iter()
        .map(|p| ParticipantShare {
            user_id: p.user_id,
            share,
            percentage: None,
        })
        .collect();

    absorb_residual(&mut shares, total_amount, 0)?;
    Ok(shares)
}

/// Exact split. Declared shares must already reconcile with the total.
fn split_exact(
    total_amount: Money,
    participants: &[ParticipantInput],
) -> Result<Vec<ParticipantShare>, StrategyFailure> {
    let mut shares = Vec::with_capacity(participants.len());

    for participant in participants {
        let declared = participant.share.ok_or_else(|| {
            SplitError::InvalidParticipants(format!(
                "user {} has no declared share",
                participant.user_id
            ))
        })?;
        if declared < Decimal::ZERO {
            return Err(SplitError::InvalidAmount(format!(
                "share for user {} cannot be negative, got {declared}",
                participant.user_id
            ))
            .into());
        }

        shares.push(ParticipantShare {
            user_id: participant.user_id,
            share: Money::from_decimal(declared)?,
            percentage: None,
        });
    }

    let total_shares = Money::checked_sum(shares.iter().map(|s| s.share))?;
    if total_shares != total_amount {
        return Err(SplitError::InvalidAmount(format!(
            "sum of shares ({total_shares}) does not equal total amount ({total_amount})"
        ))
        .into());
    }

    Ok(shares)
}

/// Percentage split. The participant with the strictly highest percentage
/// (first one on ties) absorbs the residual.
fn split_percentage(
    total_amount: Money,
    participants: &[ParticipantInput],
) -> Result<Vec<ParticipantShare>, StrategyFailure> {
    let mut percentages = Vec::with_capacity(participants.len());

    for participant in participants {
        let percentage = participant.percentage.ok_or_else(|| {
            SplitError::InvalidParticipants(format!(
                "user {} has no declared percentage",
                participant.user_id
            ))
        })?;
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(SplitError::InvalidParticipants(format!(
                "percentage for user {} must be between 0 and 100, got {percentage}",
                participant.user_id
            ))
            .into());
        }
        percentages.push(percentage);
    }

    let total_percentage = percentages
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))
        .ok_or(MoneyError::Overflow)?;
    if total_percentage != Decimal::ONE_HUNDRED {
        return Err(SplitError::InvalidParticipants(format!(
            "sum of percentages ({total_percentage}) must equal 100"
        ))
        .into());
    }

    let mut shares = Vec::with_capacity(participants.len());
    let mut absorber = 0;
    for (index, (participant, percentage)) in participants.iter().zip(&percentages).enumerate() {
        if *percentage > percentages[absorber] {
            absorber = index;
        }
        shares.push(ParticipantShare {
            user_id: participant.user_id,
            share: total_amount.percent(*percentage)?,
            percentage: Some(*percentage),
        });
    }

    absorb_residual(&mut shares, total_amount, absorber)?;
    Ok(shares)
}
