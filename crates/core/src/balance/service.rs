//! Balance aggregation over expense history.

use std::collections::HashMap;

use divvy_shared::types::{ExpenseId, Money, UserId};

use super::error::BalanceError;
use super::types::{
    Expense, ExpenseParticipation, InvolvedExpense, PaidExpense, User, UserBalance,
};

/// Balance aggregator.
///
/// Pure fold over collections the caller has already fetched, ideally from a
/// single consistent read. No I/O happens here.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Calculate the balance of one user.
    ///
    /// A creator who also participates in their own expense counts the expense
    /// amount as paid and their own share as owed.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::UserNotFound` if `user_id` is not in `users`, or
    /// `BalanceError::Arithmetic` if a total overflows.
    pub fn balance_for(
        user_id: UserId,
        users: &[User],
        expenses: &[Expense],
        participations: &[ExpenseParticipation],
    ) -> Result<UserBalance, BalanceError> {
        let user = users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or(BalanceError::UserNotFound(user_id))?;

        let descriptions = index_descriptions(expenses);
        Self::fold_user(user, expenses, participations, &descriptions)
    }

    /// Calculate balances for every user, in the order of `users`.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::Arithmetic` if a total overflows.
    pub fn group_balances(
        users: &[User],
        expenses: &[Expense],
        participations: &[ExpenseParticipation],
    ) -> Result<Vec<UserBalance>, BalanceError> {
        let descriptions = index_descriptions(expenses);
        users
            .iter()
            .map(|user| Self::fold_user(user, expenses, participations, &descriptions))
            .collect()
    }

    fn fold_user(
        user: &User,
        expenses: &[Expense],
        participations: &[ExpenseParticipation],
        descriptions: &HashMap<ExpenseId, &str>,
    ) -> Result<UserBalance, BalanceError> {
        let expenses_paid: Vec<PaidExpense> = expenses
            .iter()
            .filter(|e| e.creator_id == user.id)
            .map(|e| PaidExpense {
                id: e.id,
                description: e.description.clone(),
                amount: e.amount,
                date: e.date,
                split_method: e.split_method,
            })
            .collect();

        let expenses_involved: Vec<InvolvedExpense> = participations
            .iter()
            .filter(|p| p.user_id == user.id)
            .map(|p| {
                let description = descriptions.get(&p.expense_id).map(|d| (*d).to_string());
                if description.is_none() {
                    tracing::warn!(
                        user_id = %user.id,
                        expense_id = %p.expense_id,
                        "participation references an expense outside the snapshot"
                    );
                }
                InvolvedExpense {
                    id: p.expense_id,
                    description,
                    share_amount: p.share_amount,
                }
            })
            .collect();

        let total_paid = Money::checked_sum(expenses_paid.iter().map(|e| e.amount))?;
        let total_owed = Money::checked_sum(expenses_involved.iter().map(|e| e.share_amount))?;
        let net_balance = total_paid.checked_sub(total_owed)?;

        Ok(UserBalance {
            user_id: user.id,
            name: user.name.clone(),
            total_paid,
            total_owed,
            net_balance,
            expenses_paid,
            expenses_involved,
        })
    }
}

fn index_descriptions(expenses: &[Expense]) -> HashMap<ExpenseId, &str> {
    expenses
        .iter()
        .map(|e| (e.id, e.description.as_str()))
        .collect()
}
