//! Settlement domain types.

use divvy_shared::types::{Money, UserId};
use serde::{Deserialize, Serialize};

use crate::balance::UserBalance;

/// A user's signed net position; positive means the group owes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    /// The user ID.
    pub user_id: UserId,
    /// Net balance.
    pub net_balance: Money,
}

impl NetBalance {
    /// Creates a net balance.
    #[must_use]
    pub const fn new(user_id: UserId, net_balance: Money) -> Self {
        Self {
            user_id,
            net_balance,
        }
    }
}

impl From<&UserBalance> for NetBalance {
    fn from(balance: &UserBalance) -> Self {
        Self::new(balance.user_id, balance.net_balance)
    }
}

/// A recommended payment from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// The user who pays.
    pub from: UserId,
    /// The user who receives.
    pub to: UserId,
    /// Amount, always positive.
    pub amount: Money,
}
