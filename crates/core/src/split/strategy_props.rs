//! Property-based tests for share computation.
//!
//! Property 1: Share Sum Invariant
//! Property 2: Residual Placement

use divvy_shared::types::{Money, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{ParticipantInput, SplitMethod};

/// Strategy to generate positive totals (0.01 to 1,000,000.00).
fn positive_total() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_cents)
}

/// Strategy to generate participant counts (1 to 50).
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..=50
}

fn user(index: usize) -> UserId {
    UserId::new(i64::try_from(index).unwrap_or(i64::MAX) + 1)
}

/// Strategy to generate cent-precision percentages summing to exactly 100.
///
/// Draws random weights, converts them to basis points and gives the last
/// participant whatever is left over.
fn percentages_summing_to_100() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..1000, 1..=50).prop_map(|weights| {
        let total_weight: u32 = weights.iter().sum();
        let mut basis_points: Vec<i64> = weights
            .iter()
            .map(|w| i64::from(*w) * 10_000 / i64::from(total_weight))
            .collect();
        let assigned: i64 = basis_points.iter().sum();
        if let Some(last) = basis_points.last_mut() {
            *last += 10_000 - assigned;
        }
        basis_points
            .into_iter()
            .map(|bp| Decimal::new(bp, 2))
            .collect()
    })
}

/// Strategy to generate an exact split: declared shares and their sum.
fn exact_shares() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..10_000_000, 1..=50)
        .prop_filter("total must be positive", |cents| cents.iter().sum::<i64>() > 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Property 1: Share Sum Invariant
    // =========================================================================

    /// Property 1.1: Equal shares sum to the total.
    #[test]
    fn prop_equal_sum_equals_total(
        total in positive_total(),
        count in participant_count(),
    ) {
        let participants: Vec<_> = (0..count).map(|i| ParticipantInput::equal(user(i))).collect();
        let result = SplitMethod::Equal.split(total, &participants).unwrap();

        prop_assert_eq!(result.len(), count);
        prop_assert_eq!(Money::checked_sum(result.iter().map(|(_, s)| s)).unwrap(), total);
    }

    /// Property 1.2: Equal shares differ from each other by the residual only.
    ///
    /// Every participant but the first receives the same rounded share.
    #[test]
    fn prop_equal_non_first_shares_identical(
        total in positive_total(),
        count in 2usize..=50,
    ) {
        let participants: Vec<_> = (0..count).map(|i| ParticipantInput::equal(user(i))).collect();
        let result = SplitMethod::Equal.split(total, &participants).unwrap();

        let expected = total.div_round(count).unwrap();
        for share in result.shares.iter().skip(1) {
            prop_assert_eq!(share.share, expected);
        }
    }

    /// Property 1.3: Percentage shares sum to the total.
    #[test]
    fn prop_percentage_sum_equals_total(
        total in positive_total(),
        percentages in percentages_summing_to_100(),
    ) {
        let participants: Vec<_> = percentages
            .iter()
            .enumerate()
            .map(|(i, p)| ParticipantInput::percentage(user(i), *p))
            .collect();
        let result = SplitMethod::Percentage.split(total, &participants).unwrap();

        prop_assert_eq!(Money::checked_sum(result.iter().map(|(_, s)| s)).unwrap(), total);
    }

    /// Property 1.4: Exact shares that add up are accepted unchanged.
    #[test]
    fn prop_exact_accepts_reconciled_shares(cents in exact_shares()) {
        let total = Money::from_cents(cents.iter().sum());
        let participants: Vec<_> = cents
            .iter()
            .enumerate()
            .map(|(i, c)| ParticipantInput::exact(user(i), Decimal::new(*c, 2)))
            .collect();
        let result = SplitMethod::Exact.split(total, &participants).unwrap();

        for (share, declared) in result.shares.iter().zip(&cents) {
            prop_assert_eq!(share.share.cents(), *declared);
        }
        prop_assert_eq!(Money::checked_sum(result.iter().map(|(_, s)| s)).unwrap(), total);
    }

    /// Property 1.5: Exact shares off by any amount are rejected.
    #[test]
    fn prop_exact_rejects_unreconciled_shares(
        cents in exact_shares(),
        drift in prop_oneof![-1000i64..=-1, 1i64..=1000],
    ) {
        let declared_total: i64 = cents.iter().sum();
        let total = Money::from_cents(declared_total + drift);
        prop_assume!(total.is_positive());

        let participants: Vec<_> = cents
            .iter()
            .enumerate()
            .map(|(i, c)| ParticipantInput::exact(user(i), Decimal::new(*c, 2)))
            .collect();
        let result = SplitMethod::Exact.split(total, &participants);
        prop_assert!(result.is_err());
    }

    // =========================================================================
    // Property 2: Residual Placement
    // =========================================================================

    /// Property 2.1: Only the highest-percentage participant deviates from
    /// the plain rounded percentage share.
    #[test]
    fn prop_percentage_residual_only_on_absorber(
        total in positive_total(),
        percentages in percentages_summing_to_100(),
    ) {
        let participants: Vec<_> = percentages
            .iter()
            .enumerate()
            .map(|(i, p)| ParticipantInput::percentage(user(i), *p))
            .collect();
        let result = SplitMethod::Percentage.split(total, &participants).unwrap();

        let mut absorber = 0;
        for (i, p) in percentages.iter().enumerate() {
            if *p > percentages[absorber] {
                absorber = i;
            }
        }

        for (i, (share, p)) in result.shares.iter().zip(&percentages).enumerate() {
            if i != absorber {
                prop_assert_eq!(share.share, total.percent(*p).unwrap());
            }
        }
    }
}
