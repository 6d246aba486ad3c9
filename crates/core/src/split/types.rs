//! Split domain types.

use divvy_shared::types::{Money, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SplitError;

/// How an expense total is divided among participants.
///
/// The set of methods is closed; each variant's computation lives in
/// [`SplitMethod::split`](super::strategy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Everyone owes the same amount.
    Equal,
    /// Every participant declares an exact amount.
    Exact,
    /// Every participant declares a percentage of the total.
    Percentage,
}

impl SplitMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
        }
    }
}

impl std::fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SplitMethod {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" => Ok(Self::Percentage),
            _ => Err(SplitError::InvalidSplitMethod(s.to_string())),
        }
    }
}

/// Method-specific input for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInput {
    /// The participant.
    pub user_id: UserId,
    /// Declared share, used by the exact method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<Decimal>,
    /// Declared percentage, used by the percentage method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl ParticipantInput {
    /// Participant of an equal split.
    #[must_use]
    pub const fn equal(user_id: UserId) -> Self {
        Self {
            user_id,
            share: None,
            percentage: None,
        }
    }

    /// Participant of an exact split with a declared share.
    #[must_use]
    pub const fn exact(user_id: UserId, share: Decimal) -> Self {
        Self {
            user_id,
            share: Some(share),
            percentage: None,
        }
    }

    /// Participant of a percentage split with a declared percentage.
    #[must_use]
    pub const fn percentage(user_id: UserId, percentage: Decimal) -> Self {
        Self {
            user_id,
            share: None,
            percentage: Some(percentage),
        }
    }

    /// Builds an input from a raw numeric literal as received from a caller.
    ///
    /// The literal is the declared share for `exact`, the declared percentage for
    /// `percentage`, and ignored for `equal`.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::Calculation` if the literal is not a valid decimal.
    pub fn parse(
        user_id: UserId,
        method: SplitMethod,
        literal: Option<&str>,
    ) -> Result<Self, SplitError> {
        let value = literal
            .map(|raw| {
                raw.trim().parse::<Decimal>().map_err(|e| {
                    tracing::warn!(%user_id, %method, literal = raw, "malformed participant value");
                    SplitError::calculation(format!("{method} shares for user {user_id}"), e.into())
                })
            })
            .transpose()?;

        Ok(match (method, value) {
            (SplitMethod::Equal, _) => Self::equal(user_id),
            (SplitMethod::Exact, value) => Self {
                user_id,
                share: value,
                percentage: None,
            },
            (SplitMethod::Percentage, value) => Self {
                user_id,
                share: None,
                percentage: value,
            },
        })
    }
}

/// A validated split request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Total expense amount.
    pub total_amount: Money,
    /// Split method.
    pub method: SplitMethod,
    /// Participants in canonical order.
    pub participants: Vec<ParticipantInput>,
}

/// One participant's computed share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// The participant.
    pub user_id: UserId,
    /// Amount owed for the expense.
    pub share: Money,
    /// Declared percentage (percentage method only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

/// Computed shares for an expense.
///
/// The shares always sum to `total_amount` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// Method used.
    pub method: SplitMethod,
    /// Total that was split.
    pub total_amount: Money,
    /// Shares in participant input order.
    pub shares: Vec<ParticipantShare>,
}

impl SplitResult {
    /// Returns the share for `user_id`, if they participate.
    #[must_use]
    pub fn share_of(&self, user_id: UserId) -> Option<Money> {
        self.shares
            .iter()
            .find(|s| s.user_id == user_id)
            .map(|s| s.share)
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Returns true if there are no shares.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Iterates over `(participant, share)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (UserId, Money)> + '_ {
        self.shares.iter().map(|s| (s.user_id, s.share))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{self, Layer, SubscriberExt};

    #[rstest]
    #[case("equal", SplitMethod::Equal)]
    #[case("EXACT", SplitMethod::Exact)]
    #[case(" Percentage ", SplitMethod::Percentage)]
    fn test_method_from_str(#[case] raw: &str, #[case] expected: SplitMethod) {
        assert_eq!(raw.parse::<SplitMethod>().unwrap(), expected);
    }

    #[rstest]
    #[case("weighted")]
    #[case("")]
    #[case("equally")]
    fn test_method_from_str_rejects_unknown(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<SplitMethod>(),
            Err(SplitError::InvalidSplitMethod(_))
        ));
    }

    #[test]
    fn test_method_wire_names() {
        assert_eq!(SplitMethod::Percentage.to_string(), "percentage");
        assert_eq!(
            serde_json::to_string(&SplitMethod::Exact).unwrap(),
            "\"exact\""
        );
    }

    #[test]
    fn test_parse_participant_literal() {
        let user = UserId::new(1);

        let input = ParticipantInput::parse(user, SplitMethod::Exact, Some("40.50")).unwrap();
        assert_eq!(input, ParticipantInput::exact(user, dec!(40.50)));

        let input = ParticipantInput::parse(user, SplitMethod::Percentage, Some("25")).unwrap();
        assert_eq!(input, ParticipantInput::percentage(user, dec!(25)));

        let input = ParticipantInput::parse(user, SplitMethod::Equal, Some("99")).unwrap();
        assert_eq!(input, ParticipantInput::equal(user));

        let input = ParticipantInput::parse(user, SplitMethod::Exact, None).unwrap();
        assert_eq!(input.share, None);
    }

    #[test]
    fn test_parse_malformed_literal_is_calculation_error() {
        let err = ParticipantInput::parse(UserId::new(1), SplitMethod::Exact, Some("12,50"))
            .unwrap_err();
        assert!(matches!(err, SplitError::Calculation { .. }));
    }

    #[test]
    fn test_split_result_lookup() {
        let result = SplitResult {
            method: SplitMethod::Equal,
            total_amount: Money::from_cents(300),
            shares: vec![
                ParticipantShare {
                    user_id: UserId::new(1),
                    share: Money::from_cents(200),
                    percentage: None,
                },
                ParticipantShare {
                    user_id: UserId::new(2),
                    share: Money::from_cents(100),
                    percentage: None,
                },
            ],
        };

        assert_eq!(result.len(), 2);
        assert_eq!(result.share_of(UserId::new(2)), Some(Money::from_cents(100)));
        assert_eq!(result.share_of(UserId::new(3)), None);
        assert_eq!(
            result.iter().collect::<Vec<_>>(),
            vec![
                (UserId::new(1), Money::from_cents(200)),
                (UserId::new(2), Money::from_cents(100)),
            ]
        );
    }

    /// Collects the level of every event emitted while it is installed.
    #[derive(Clone, Default)]
    struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for LevelRecorder {
        fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[test]
    fn test_malformed_literal_is_not_logged_as_error() {
        let recorder = LevelRecorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());

        let result = tracing::subscriber::with_default(subscriber, || {
            ParticipantInput::parse(UserId::new(1), SplitMethod::Exact, Some("ten"))
        });

        assert!(matches!(result, Err(SplitError::Calculation { .. })));
        let levels = recorder.0.lock().unwrap();
        assert_eq!(*levels, vec![Level::WARN]);
    }
}
