//! Property-based tests for settlement planning.
//!
//! Property 3: Settlement Completeness
//! Property 4: Transfer Count Bound

use divvy_shared::types::{Money, UserId};
use proptest::prelude::*;

use super::error::SettlementError;
use super::service::SettlementOptimizer;
use super::types::NetBalance;

/// Strategy to generate balances that sum to zero.
///
/// The last user takes whatever the others leave over.
fn zero_sum_balances() -> impl Strategy<Value = Vec<NetBalance>> {
    prop::collection::vec(-10_000_000i64..10_000_000, 1..30).prop_map(|cents| {
        let remainder: i64 = -cents.iter().sum::<i64>();
        cents
            .into_iter()
            .chain(std::iter::once(remainder))
            .zip(1i64..)
            .map(|(c, id)| NetBalance::new(UserId::new(id), Money::from_cents(c)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property 3: Settlement Completeness
    // =========================================================================

    /// Property 3.1: Applying the plan zeroes every balance.
    #[test]
    fn prop_plan_zeroes_all_balances(balances in zero_sum_balances()) {
        let transfers = SettlementOptimizer::settle(&balances).unwrap();
        let settled = SettlementOptimizer::apply(&balances, &transfers).unwrap();

        for balance in settled {
            prop_assert!(balance.net_balance.is_zero(), "user {} left at {}", balance.user_id, balance.net_balance);
        }
    }

    /// Property 3.2: Every transfer is positive and goes from a debtor to a creditor.
    #[test]
    fn prop_transfers_flow_from_debtors_to_creditors(balances in zero_sum_balances()) {
        let transfers = SettlementOptimizer::settle(&balances).unwrap();

        for transfer in &transfers {
            prop_assert!(transfer.amount.is_positive());
            let from = balances.iter().find(|b| b.user_id == transfer.from).unwrap();
            let to = balances.iter().find(|b| b.user_id == transfer.to).unwrap();
            prop_assert!(from.net_balance.is_negative());
            prop_assert!(to.net_balance.is_positive());
        }
    }

    /// Property 3.3: Planning is deterministic.
    #[test]
    fn prop_plan_is_deterministic(balances in zero_sum_balances()) {
        let first = SettlementOptimizer::settle(&balances).unwrap();
        let second = SettlementOptimizer::settle(&balances).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property 3.4: Any non-zero total is rejected.
    #[test]
    fn prop_non_zero_total_rejected(
        balances in zero_sum_balances(),
        corruption in prop_oneof![-1000i64..=-1, 1i64..=1000],
    ) {
        let mut corrupted = balances;
        if let Some(last) = corrupted.last_mut() {
            last.net_balance = Money::from_cents(last.net_balance.cents() + corruption);
        }
        let result = SettlementOptimizer::settle(&corrupted);
        let is_inconsistent = matches!(result, Err(SettlementError::Inconsistency { .. }));
        prop_assert!(is_inconsistent);
    }

    // =========================================================================
    // Property 4: Transfer Count Bound
    // =========================================================================

    /// Property 4.1: At most one fewer transfer than non-zero parties.
    #[test]
    fn prop_transfer_count_bounded(balances in zero_sum_balances()) {
        let transfers = SettlementOptimizer::settle(&balances).unwrap();
        let non_zero = balances.iter().filter(|b| !b.net_balance.is_zero()).count();

        prop_assert!(transfers.len() <= non_zero.saturating_sub(1));
    }
}
