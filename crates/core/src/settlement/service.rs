//! Settlement planning.
//!
//! Greedy largest-first matching: the largest remaining credit is always
//! paid off by the largest remaining debt. Every step zeroes at least one
//! party, so `n` non-zero balances settle in at most `n - 1` transfers.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use divvy_shared::types::{Money, UserId};

use super::error::SettlementError;
use super::types::{NetBalance, Transfer};

/// Settlement optimizer.
pub struct SettlementOptimizer;

/// One side of the matching with the magnitude still to settle.
///
/// Ordered so a max-heap pops the largest magnitude first and, on ties, the
/// smallest user ID.
#[derive(Debug, PartialEq, Eq)]
struct Party {
    remaining: Money,
    user_id: UserId,
}

impl Ord for Party {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.user_id.cmp(&self.user_id))
    }
}

impl PartialOrd for Party {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl SettlementOptimizer {
    /// Produce transfers that bring every balance to zero.
    ///
    /// Zero balances are ignored. Transfers are returned in the order they
    /// were matched.
    ///
    /// # Errors
    ///
    /// - `SettlementError::DuplicateBalance` if a user appears twice
    /// - `SettlementError::Inconsistency` if credits and debits differ
    /// - `SettlementError::Arithmetic` on overflow
    pub fn settle(balances: &[NetBalance]) -> Result<Vec<Transfer>, SettlementError> {
        let mut seen = HashSet::with_capacity(balances.len());
        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();
        let mut credits = Money::ZERO;
        let mut debits = Money::ZERO;

        for balance in balances {
            if !seen.insert(balance.user_id) {
                return Err(SettlementError::DuplicateBalance(balance.user_id));
            }

            if balance.net_balance.is_positive() {
                credits = credits.checked_add(balance.net_balance)?;
                creditors.push(Party {
                    remaining: balance.net_balance,
                    user_id: balance.user_id,
                });
            } else if balance.net_balance.is_negative() {
                let debt = balance.net_balance.abs()?;
                debits = debits.checked_add(debt)?;
                debtors.push(Party {
                    remaining: debt,
                    user_id: balance.user_id,
                });
            }
        }

        if credits != debits {
            tracing::error!(%credits, %debits, "net balances do not cancel out");
            return Err(SettlementError::Inconsistency { credits, debits });
        }

        let mut transfers =
            Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));

        loop {
            match (creditors.pop(), debtors.pop()) {
                (Some(mut creditor), Some(mut debtor)) => {
                    let amount = creditor.remaining.min(debtor.remaining);
                    transfers.push(Transfer {
                        from: debtor.user_id,
                        to: creditor.user_id,
                        amount,
                    });

                    creditor.remaining = creditor.remaining.checked_sub(amount)?;
                    debtor.remaining = debtor.remaining.checked_sub(amount)?;
                    if !creditor.remaining.is_zero() {
                        creditors.push(creditor);
                    }
                    if !debtor.remaining.is_zero() {
                        debtors.push(debtor);
                    }
                }
                (None, None) => break,
                // Unreachable once the totals match.
                _ => return Err(SettlementError::Inconsistency { credits, debits }),
            }
        }

        tracing::debug!(
            parties = seen.len(),
            transfers = transfers.len(),
            total = %credits,
            "settlement planned"
        );
        Ok(transfers)
    }

    /// Replay `transfers` against `balances` and return the resulting balances.
    ///
    /// Paying raises the payer's net balance and lowers the payee's, so a
    /// complete plan leaves every balance at zero.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::UnknownParticipant` if a transfer names a user
    /// outside `balances`, or `SettlementError::Arithmetic` on overflow.
    pub fn apply(
        balances: &[NetBalance],
        transfers: &[Transfer],
    ) -> Result<Vec<NetBalance>, SettlementError> {
        let mut result = balances.to_vec();
        let index: HashMap<UserId, usize> = balances
            .iter()
            .enumerate()
            .map(|(i, b)| (b.user_id, i))
            .collect();

        for transfer in transfers {
            let from = *index
                .get(&transfer.from)
                .ok_or(SettlementError::UnknownParticipant(transfer.from))?;
            let to = *index
                .get(&transfer.to)
                .ok_or(SettlementError::UnknownParticipant(transfer.to))?;

            result[from].net_balance = result[from].net_balance.checked_add(transfer.amount)?;
            result[to].net_balance = result[to].net_balance.checked_sub(transfer.amount)?;
        }

        Ok(result)
    }
}
