//! Hint tiers and the progressive hint ladder.
//!
//! The ladder enforces the nudge -> guide -> direction progression:
//! each session may climb one tier at a time, re-request the current tier
//! up to a configured grant limit, and never skip ahead or fall back.
//! Hint text itself belongs to the caller's natural-language collaborator;
//! the engine only decides whether a tier may be granted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ============================================================================
// HintTier
// ============================================================================

/// Escalating levels of help, strictly ordered `Nudge < Guide < Direction`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HintTier {
    /// Gentle push in the right direction.
    Nudge,
    /// More specific guidance toward an approach.
    Guide,
    /// Clear implementation path (terminal tier).
    Direction,
}

impl HintTier {
    /// Returns the next tier up the ladder, or `None` from `Direction`.
    ///
    /// # Examples
    ///
    /// ```
    /// use phoenixx_engine::HintTier;
    ///
    /// assert_eq!(HintTier::Nudge.next(), Some(HintTier::Guide));
    /// assert_eq!(HintTier::Direction.next(), None);
    /// ```
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Nudge => Some(Self::Guide),
            Self::Guide => Some(Self::Direction),
            Self::Direction => None,
        }
    }

    /// Returns `true` if no further escalation exists beyond this tier.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Direction)
    }
}

impl std::fmt::Display for HintTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nudge => write!(f, "nudge"),
            Self::Guide => write!(f, "guide"),
            Self::Direction => write!(f, "direction"),
        }
    }
}

// ============================================================================
// HintRecord and HintGrant
// ============================================================================

/// Record of a granted hint. Append-only, owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    /// The tier that was granted.
    pub tier: HintTier,

    /// When the hint was requested.
    pub requested_at: DateTime<Utc>,
}

impl HintRecord {
    /// Creates a new `HintRecord` with an explicit timestamp.
    #[must_use]
    pub const fn new(tier: HintTier, requested_at: DateTime<Utc>) -> Self {
        Self { tier, requested_at }
    }
}

/// Outcome of a successful hint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintGrant {
    /// The tier that was granted.
    pub tier: HintTier,

    /// `true` when this grant repeats an already-granted tier.
    ///
    /// The caller re-serves its cached hint text for repeats instead of
    /// generating new material.
    pub repeated: bool,
}

// ============================================================================
// HintLadder
// ============================================================================

/// Policy view over a session's hint log.
///
/// Borrows the append-only record list; granting is performed by the
/// session, which appends a [`HintRecord`] only after the ladder approves.
#[derive(Debug, Clone, Copy)]
pub struct HintLadder<'a> {
    records: &'a [HintRecord],
    max_grants_per_tier: u32,
}

impl<'a> HintLadder<'a> {
    /// Creates a ladder over the given hint log.
    #[must_use]
    pub const fn new(records: &'a [HintRecord], max_grants_per_tier: u32) -> Self {
        Self {
            records,
            max_grants_per_tier,
        }
    }

    /// Returns the highest tier granted so far, if any.
    #[must_use]
    pub fn highest_granted(&self) -> Option<HintTier> {
        self.records.iter().map(|r| r.tier).max()
    }

    /// Returns how many times the given tier has been granted.
    #[must_use]
    pub fn grants_of(&self, tier: HintTier) -> u32 {
        u32::try_from(self.records.iter().filter(|r| r.tier == tier).count()).unwrap_or(u32::MAX)
    }

    /// Returns the tier a fresh (non-repeat) request would have to name.
    ///
    /// `None` once `Direction` has been granted; only repeats remain then.
    #[must_use]
    pub fn next_escalation(&self) -> Option<HintTier> {
        match self.highest_granted() {
            None => Some(HintTier::Nudge),
            Some(tier) => tier.next(),
        }
    }

    /// Checks whether the requested tier may be granted.
    ///
    /// The grantable requests are exactly:
    /// - the next escalation tier (one above the highest granted, or
    ///   `Nudge` on an empty log), and
    /// - a repeat of the highest granted tier while its grant count is
    ///   below the configured limit.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::HintOutOfOrder` for any other tier and
    /// `EngineError::HintExhausted` when the repeat budget is spent.
    pub fn check(&self, requested: HintTier) -> Result<HintGrant> {
        let highest = self.highest_granted();

        // Repeat of the current tier, bounded by the grant limit.
        if highest == Some(requested) {
            if self.grants_of(requested) < self.max_grants_per_tier {
                return Ok(HintGrant {
                    tier: requested,
                    repeated: true,
                });
            }
            return Err(EngineError::hint_exhausted(requested));
        }

        match self.next_escalation() {
            Some(expected) if expected == requested => Ok(HintGrant {
                tier: requested,
                repeated: false,
            }),
            Some(expected) => Err(EngineError::hint_out_of_order(requested, expected)),
            // Direction already granted and its repeats consumed elsewhere:
            // any non-repeat request is past the end of the ladder.
            None => Err(EngineError::hint_exhausted(HintTier::Direction)),
        }
    }
}

/// Returns `true` if the tiers in `records` never decrease.
///
/// Granted tiers must form a prefix of [nudge, guide, direction] with each
/// tier repeated at most the configured number of times; monotonicity is
/// the structural half of that invariant.
#[must_use]
pub fn tiers_monotonic(records: &[HintRecord]) -> bool {
    records.windows(2).all(|pair| pair[0].tier <= pair[1].tier)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(tier: HintTier) -> HintRecord {
        HintRecord::new(tier, Utc::now())
    }

    #[test]
    fn test_tier_ordering() {
        assert!(HintTier::Nudge < HintTier::Guide);
        assert!(HintTier::Guide < HintTier::Direction);
    }

    #[test]
    fn test_tier_next() {
        assert_eq!(HintTier::Nudge.next(), Some(HintTier::Guide));
        assert_eq!(HintTier::Guide.next(), Some(HintTier::Direction));
        assert_eq!(HintTier::Direction.next(), None);
        assert!(HintTier::Direction.is_terminal());
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(
            serde_json::to_string(&HintTier::Nudge).unwrap(),
            r#""nudge""#
        );
        assert_eq!(
            serde_json::to_string(&HintTier::Direction).unwrap(),
            r#""direction""#
        );
        let tier: HintTier = serde_json::from_str(r#""guide""#).unwrap();
        assert_eq!(tier, HintTier::Guide);
    }

    #[test]
    fn test_empty_log_grants_nudge_only() {
        let records = [];
        let ladder = HintLadder::new(&records, 2);

        assert_eq!(ladder.highest_granted(), None);
        assert_eq!(ladder.next_escalation(), Some(HintTier::Nudge));

        let grant = ladder.check(HintTier::Nudge).unwrap();
        assert_eq!(grant.tier, HintTier::Nudge);
        assert!(!grant.repeated);

        let err = ladder.check(HintTier::Guide).unwrap_err();
        assert!(matches!(
            err,
            EngineError::HintOutOfOrder {
                requested: HintTier::Guide,
                expected: HintTier::Nudge,
            }
        ));
    }

    #[test]
    fn test_repeat_allowed_once_then_exhausted() {
        let records = [record(HintTier::Nudge)];
        let ladder = HintLadder::new(&records, 2);
        let grant = ladder.check(HintTier::Nudge).unwrap();
        assert!(grant.repeated);

        let records = [record(HintTier::Nudge), record(HintTier::Nudge)];
        let ladder = HintLadder::new(&records, 2);
        let err = ladder.check(HintTier::Nudge).unwrap_err();
        assert!(matches!(
            err,
            EngineError::HintExhausted {
                tier: HintTier::Nudge
            }
        ));
    }

    #[test]
    fn test_escalation_after_grant() {
        let records = [record(HintTier::Nudge)];
        let ladder = HintLadder::new(&records, 2);

        let grant = ladder.check(HintTier::Guide).unwrap();
        assert_eq!(grant.tier, HintTier::Guide);
        assert!(!grant.repeated);

        // Skipping straight to direction is out of order.
        let err = ladder.check(HintTier::Direction).unwrap_err();
        assert!(matches!(err, EngineError::HintOutOfOrder { .. }));
    }

    #[test]
    fn test_no_falling_back_below_highest() {
        let records = [record(HintTier::Nudge), record(HintTier::Guide)];
        let ladder = HintLadder::new(&records, 2);

        let err = ladder.check(HintTier::Nudge).unwrap_err();
        assert!(matches!(
            err,
            EngineError::HintOutOfOrder {
                requested: HintTier::Nudge,
                expected: HintTier::Direction,
            }
        ));
    }

    #[test]
    fn test_direction_is_terminal() {
        let records = [
            record(HintTier::Nudge),
            record(HintTier::Guide),
            record(HintTier::Direction),
        ];
        let ladder = HintLadder::new(&records, 2);

        // One repeat of direction is still available.
        assert!(ladder.check(HintTier::Direction).unwrap().repeated);
        assert_eq!(ladder.next_escalation(), None);

        let records = [
            record(HintTier::Nudge),
            record(HintTier::Guide),
            record(HintTier::Direction),
            record(HintTier::Direction),
        ];
        let ladder = HintLadder::new(&records, 2);
        let err = ladder.check(HintTier::Direction).unwrap_err();
        assert!(matches!(
            err,
            EngineError::HintExhausted {
                tier: HintTier::Direction
            }
        ));

        // Lower tiers are gone for good once direction is exhausted of
        // escalations.
        let err = ladder.check(HintTier::Nudge).unwrap_err();
        assert!(matches!(err, EngineError::HintExhausted { .. }));
    }

    #[test]
    fn test_grant_limit_is_configurable() {
        let records = [record(HintTier::Nudge), record(HintTier::Nudge)];

        // Limit 3 still has a repeat left.
        let ladder = HintLadder::new(&records, 3);
        assert!(ladder.check(HintTier::Nudge).is_ok());

        // Limit 1 forbids any repeat at all.
        let records = [record(HintTier::Nudge)];
        let ladder = HintLadder::new(&records, 1);
        assert!(matches!(
            ladder.check(HintTier::Nudge).unwrap_err(),
            EngineError::HintExhausted { .. }
        ));
    }

    #[test]
    fn test_tiers_monotonic() {
        assert!(tiers_monotonic(&[]));
        assert!(tiers_monotonic(&[
            record(HintTier::Nudge),
            record(HintTier::Nudge),
            record(HintTier::Guide),
            record(HintTier::Direction),
        ]));
        assert!(!tiers_monotonic(&[
            record(HintTier::Guide),
            record(HintTier::Nudge),
        ]));
    }
}
