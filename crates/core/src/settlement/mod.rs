//! Settlement planning over net balances.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::SettlementError;
pub use service::SettlementOptimizer;
pub use types::{NetBalance, Transfer};
