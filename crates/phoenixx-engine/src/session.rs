//! Session state for one interview attempt.
//!
//! A [`SessionState`] is an immutable snapshot: every operation consumes a
//! borrowed prior snapshot and returns a new one, leaving the input
//! untouched. One owner holds the current snapshot; readers receive
//! copies or read-only views. Once `ended_at` is set the session is
//! terminal and every mutation fails with `SessionClosed`.
//!
//! Hosting a session in a multi-session server only requires serializing
//! operations per session identity; snapshots share nothing mutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::hint::{HintGrant, HintLadder, HintRecord, HintTier};
use crate::problem::Problem;
use crate::scoring::{evaluate, Executor, ScoreReport};

// ============================================================================
// Submission
// ============================================================================

/// A code submission within a session.
///
/// Sessions hold every submission; the latest one is authoritative for
/// scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// The submitted source code.
    pub code: String,

    /// When the submission was made.
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a new `Submission`.
    #[must_use]
    pub fn new(code: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            submitted_at,
        }
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Authoritative state of one candidate's attempt at one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// The problem under attempt. Immutable for the session's lifetime.
    pub problem: Problem,

    /// All submissions, in order. The last one is authoritative.
    pub submissions: Vec<Submission>,

    /// Append-only log of granted hints.
    pub hints: Vec<HintRecord>,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// When the session ended; `None` while in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Score report for the last submission; never stale relative to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_report: Option<ScoreReport>,
}

impl SessionState {
    /// Starts a fresh session over the given problem.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidProblem` if the problem fails
    /// validation (most importantly: an empty test-case set).
    pub fn start(problem: Problem, clock: &dyn Clock) -> Result<Self> {
        problem.validate()?;
        info!(problem = %problem.id, "Session started");
        Ok(Self {
            problem,
            submissions: Vec::new(),
            hints: Vec::new(),
            started_at: clock.now(),
            ended_at: None,
            latest_report: None,
        })
    }

    /// Records a submission and scores it, returning the new snapshot.
    ///
    /// The prior snapshot is left untouched; `latest_report` on the new
    /// snapshot always reflects this submission.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionClosed` if the session has ended.
    pub fn submit(
        &self,
        code: impl Into<String>,
        executor: &mut dyn Executor,
        config: &EngineConfig,
        clock: &dyn Clock,
    ) -> Result<Self> {
        self.ensure_open()?;

        let code = code.into();
        let report = evaluate(&self.problem, &code, &self.hints, executor, config);
        info!(
            problem = %self.problem.id,
            submission = self.submissions.len() + 1,
            passed = report.passed_count,
            total = report.total_count,
            quality = report.quality_score,
            "Submission scored"
        );

        let mut next = self.clone();
        next.submissions.push(Submission::new(code, clock.now()));
        next.latest_report = Some(report);
        Ok(next)
    }

    /// Requests a hint at the given tier.
    ///
    /// Delegates to the [`HintLadder`]; on success the grant is appended
    /// to the hint log of the returned snapshot. On denial the error is
    /// returned and no state changes anywhere.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionClosed` on a terminal session,
    /// `EngineError::HintOutOfOrder` for a tier other than the next
    /// grantable one, and `EngineError::HintExhausted` when the tier's
    /// grant budget is spent.
    pub fn request_hint(
        &self,
        tier: HintTier,
        config: &EngineConfig,
        clock: &dyn Clock,
    ) -> Result<(Self, HintGrant)> {
        self.ensure_open()?;

        let ladder = HintLadder::new(&self.hints, config.max_grants_per_tier);
        let grant = ladder.check(tier)?;
        debug!(
            problem = %self.problem.id,
            tier = %grant.tier,
            repeated = grant.repeated,
            "Hint granted"
        );

        let mut next = self.clone();
        next.hints.push(HintRecord::new(grant.tier, clock.now()));
        Ok((next, grant))
    }

    /// Ends the session, making it read-only.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionClosed` if already ended.
    pub fn finish(&self, clock: &dyn Clock) -> Result<Self> {
        self.ensure_open()?;

        let mut next = self.clone();
        next.ended_at = Some(clock.now());
        info!(
            problem = %self.problem.id,
            submissions = next.submissions.len(),
            hints = next.hints.len(),
            "Session finished"
        );
        Ok(next)
    }

    /// Returns `true` once the session has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Returns the number of hints granted so far.
    #[must_use]
    pub fn hints_used(&self) -> usize {
        self.hints.len()
    }

    /// Returns the latest submission, if any.
    #[must_use]
    pub fn latest_submission(&self) -> Option<&Submission> {
        self.submissions.last()
    }

    /// Returns the session duration up to `now`, or up to `ended_at` for
    /// a finished session.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.ended_at.unwrap_or(now) - self.started_at
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_terminal() {
            return Err(EngineError::SessionClosed);
        }
        Ok(())
    }
}
