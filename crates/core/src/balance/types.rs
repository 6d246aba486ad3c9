//! Balance domain types.
//!
//! `User`, `Expense` and `ExpenseParticipation` are the already-fetched records
//! the aggregator folds over; `UserBalance` is what it produces.

use chrono::NaiveDateTime;
use divvy_shared::types::{ExpenseId, Money, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::split::SplitMethod;

/// A group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// A recorded expense, paid in full by its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The expense ID.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// Total amount paid.
    pub amount: Money,
    /// When the expense happened.
    pub date: NaiveDateTime,
    /// How the amount was split.
    pub split_method: SplitMethod,
    /// The user who paid.
    pub creator_id: UserId,
}

/// One user's share of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseParticipation {
    /// The expense.
    pub expense_id: ExpenseId,
    /// The participant.
    pub user_id: UserId,
    /// Amount the participant owes for the expense.
    pub share_amount: Money,
    /// Declared percentage (percentage splits only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_percentage: Option<Decimal>,
}

/// An expense the user paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidExpense {
    /// The expense ID.
    pub id: ExpenseId,
    /// Expense description.
    pub description: String,
    /// Amount paid.
    pub amount: Money,
    /// Expense date.
    pub date: NaiveDateTime,
    /// Split method used.
    pub split_method: SplitMethod,
}

/// An expense the user owes a share of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvolvedExpense {
    /// The expense ID.
    pub id: ExpenseId,
    /// Expense description, absent if the expense was not among the inputs.
    pub description: Option<String>,
    /// The user's share.
    pub share_amount: Money,
}

/// A user's paid/owed position across all expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    /// The user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Sum of the amounts of expenses the user created.
    pub total_paid: Money,
    /// Sum of the user's shares across all participations.
    pub total_owed: Money,
    /// `total_paid - total_owed`; positive means the group owes this user.
    pub net_balance: Money,
    /// Expenses paid by the user.
    pub expenses_paid: Vec<PaidExpense>,
    /// Expenses the user participates in.
    pub expenses_involved: Vec<InvolvedExpense>,
}
