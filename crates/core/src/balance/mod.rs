//! Paid/owed balance aggregation.

pub mod error;
pub mod service;
pub mod types;

pub use error::BalanceError;
pub use service::BalanceAggregator;
pub use types::{Expense, ExpenseParticipation, InvolvedExpense, PaidExpense, User, UserBalance};
