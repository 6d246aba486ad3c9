//! Group ledger.
//!
//! Ties splitting, balance aggregation and settlement together over a single
//! snapshot of users, expenses and participations.

pub mod error;
pub mod snapshot;

pub use error::LedgerError;
pub use snapshot::{LedgerSnapshot, NewExpense};
