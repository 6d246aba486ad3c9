//! Expense splitting.
//!
//! This module implements share computation for a single expense:
//! - Split methods (equal, exact, percentage) as a closed enum
//! - Participant input and share types
//! - The expense calculator entry point
//! - Error types for split validation

pub mod error;
pub mod service;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod strategy_props;

pub use error::SplitError;
pub use service::ExpenseCalculator;
pub use types::{ParticipantInput, ParticipantShare, SplitMethod, SplitRequest, SplitResult};
