//! Core business logic for Divvy.
//!
//! This crate contains pure expense-sharing logic with no storage or I/O.
//! Money is integer cents throughout; every calculation is deterministic.
//!
//! # Modules
//!
//! - `split` - Splitting one expense into per-participant shares
//! - `balance` - Paid/owed/net balances per user
//! - `settlement` - Minimal transfers that settle a group
//! - `ledger` - In-memory snapshot tying the three together

pub mod balance;
pub mod ledger;
pub mod settlement;
pub mod split;
