//! In-memory ledger snapshot.
//!
//! Holds users, expenses and participations as one consistent view. Recording
//! an expense computes every share before touching the snapshot, so an expense
//! is either stored with all of its participations or not at all.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use divvy_shared::types::{ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::balance::{BalanceAggregator, Expense, ExpenseParticipation, User, UserBalance};
use crate::settlement::{NetBalance, SettlementOptimizer, Transfer};
use crate::split::{ExpenseCalculator, ParticipantInput, SplitMethod};

/// Input for recording a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    /// The user who paid.
    pub creator_id: UserId,
    /// What the money was spent on.
    pub description: String,
    /// Total amount, at most two decimal places.
    pub amount: Decimal,
    /// Split method name.
    pub split_method: String,
    /// When the expense happened.
    pub date: NaiveDateTime,
    /// Participants in canonical order.
    pub participants: Vec<ParticipantInput>,
}

/// Users, expenses and participations read together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Group members.
    #[serde(default)]
    pub users: Vec<User>,
    /// Recorded expenses.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Shares of recorded expenses.
    #[serde(default)]
    pub participations: Vec<ExpenseParticipation>,
}

impl LedgerSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a user.
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Adds a user and returns the assigned ID.
    pub fn add_user(&mut self, name: impl Into<String>) -> UserId {
        let id = self
            .users
            .iter()
            .map(|u| u.id)
            .max()
            .map_or(UserId::new(1), UserId::next);
        self.users.push(User {
            id,
            name: name.into(),
        });
        id
    }

    /// Records an expense together with all of its participations.
    ///
    /// # Errors
    ///
    /// - `LedgerError::EmptyDescription` if the description is blank
    /// - `LedgerError::UserNotFound` if the creator or a participant is unknown
    /// - `LedgerError::Split` if the shares cannot be calculated
    ///
    /// The snapshot is unchanged when an error is returned.
    pub fn record_expense(&mut self, new: NewExpense) -> Result<ExpenseId, LedgerError> {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(LedgerError::EmptyDescription);
        }

        let known: HashSet<UserId> = self.users.iter().map(|u| u.id).collect();
        if !known.contains(&new.creator_id) {
            return Err(LedgerError::UserNotFound(new.creator_id));
        }
        if let Some(unknown) = new
            .participants
            .iter()
            .find(|p| !known.contains(&p.user_id))
        {
            return Err(LedgerError::UserNotFound(unknown.user_id));
        }

        let split =
            ExpenseCalculator::calculate_shares(&new.split_method, new.amount, &new.participants)?;

        let id = self
            .expenses
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(ExpenseId::new(1), ExpenseId::next);

        let participations = split
            .shares
            .iter()
            .map(|share| ExpenseParticipation {
                expense_id: id,
                user_id: share.user_id,
                share_amount: share.share,
                share_percentage: match split.method {
                    SplitMethod::Percentage => share.percentage,
                    SplitMethod::Equal | SplitMethod::Exact => None,
                },
            });

        self.expenses.push(Expense {
            id,
            description: description.to_string(),
            amount: split.total_amount,
            date: new.date,
            split_method: split.method,
            creator_id: new.creator_id,
        });
        self.participations.extend(participations);

        tracing::info!(
            expense_id = %id,
            creator_id = %new.creator_id,
            amount = %split.total_amount,
            method = %split.method,
            participants = split.len(),
            "expense recorded"
        );
        Ok(id)
    }

    /// Expenses the user created or participates in.
    #[must_use]
    pub fn expenses_for(&self, user_id: UserId) -> Vec<&Expense> {
        let involved: HashSet<ExpenseId> = self
            .participations
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.expense_id)
            .collect();

        self.expenses
            .iter()
            .filter(|e| e.creator_id == user_id || involved.contains(&e.id))
            .collect()
    }

    /// Participations of one expense.
    pub fn participations_of(
        &self,
        expense_id: ExpenseId,
    ) -> impl Iterator<Item = &ExpenseParticipation> + '_ {
        self.participations
            .iter()
            .filter(move |p| p.expense_id == expense_id)
    }

    /// Balance of one user.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Balance` if the user is unknown or totals overflow.
    pub fn user_balance(&self, user_id: UserId) -> Result<UserBalance, LedgerError> {
        Ok(BalanceAggregator::balance_for(
            user_id,
            &self.users,
            &self.expenses,
            &self.participations,
        )?)
    }

    /// Balances of every user, in user order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Balance` if totals overflow.
    pub fn group_balances(&self) -> Result<Vec<UserBalance>, LedgerError> {
        Ok(BalanceAggregator::group_balances(
            &self.users,
            &self.expenses,
            &self.participations,
        )?)
    }

    /// Transfers that settle the whole group.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Balance` or `LedgerError::Settlement` if the
    /// stored history does not reconcile.
    pub fn settlement_plan(&self) -> Result<Vec<Transfer>, LedgerError> {
        let balances: Vec<NetBalance> = self
            .group_balances()?
            .iter()
            .map(NetBalance::from)
            .collect();
        Ok(SettlementOptimizer::settle(&balances)?)
    }
}
