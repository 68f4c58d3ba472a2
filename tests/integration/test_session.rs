//! End-to-end integration tests for the interview engine
//!
//! These tests drive a full session through the public API: problem and
//! config loading from fixtures, hint progression, scoring with a
//! scripted executor, and terminal-state enforcement. No Docker is
//! required; execution is simulated.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use phoenixx_engine::{
    EngineConfig, EngineError, Execution, ExecutionError, Executor, FixedClock, HintTier, Problem,
    SessionState,
};

/// Path to the fixture directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Executor that produces the correct two-sum output for every fixture case.
struct SolvingExecutor;

impl Executor for SolvingExecutor {
    fn run(
        &mut self,
        _code: &str,
        input: &str,
        _time_limit: Duration,
    ) -> Result<Execution, ExecutionError> {
        let output = match input {
            "2 7 11 15\n9" => "0 1",
            "3 2 4\n6" => "1 2",
            "3 3\n6" => "0 1",
            _ => "",
        };
        Ok(Execution {
            output: output.to_string(),
            elapsed: Some(Duration::from_millis(10)),
        })
    }
}

/// Executor that fails the second case with a timeout and answers the
/// rest correctly.
struct FlakyExecutor;

impl Executor for FlakyExecutor {
    fn run(
        &mut self,
        _code: &str,
        input: &str,
        time_limit: Duration,
    ) -> Result<Execution, ExecutionError> {
        match input {
            "2 7 11 15\n9" => Ok(Execution {
                output: "0 1".to_string(),
                elapsed: None,
            }),
            "3 2 4\n6" => Err(ExecutionError::timeout(time_limit)),
            _ => Ok(Execution {
                output: "0 1".to_string(),
                elapsed: None,
            }),
        }
    }
}

fn clock() -> FixedClock {
    FixedClock::epoch()
}

/// Tests that the fixture problem loads and validates.
#[test]
fn test_fixture_problem_loads() {
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");

    assert_eq!(problem.id, "two-sum");
    assert_eq!(problem.title, "Two Sum");
    assert_eq!(problem.test_cases.len(), 3);
    assert_eq!(problem.examples.len(), 2);
    assert!(problem.validate().is_ok());
}

/// Tests that the fixture config loads with all values applied.
#[test]
fn test_fixture_config_loads() {
    let config_path = fixture_path().join("phoenixx.json");
    let config = EngineConfig::load_from_file(&config_path).expect("Failed to load config");

    assert_eq!(config.problem_dir, "fixtures");
    assert_eq!(config.max_grants_per_tier, 2);
    assert_eq!(config.case_time_limit_ms, 1000);
    assert_eq!(config.hint_penalties.for_tier(HintTier::Guide), 5);
}

/// Tests a complete successful session: hints, scored submission, finish.
#[test]
fn test_full_session_with_hints_and_scoring() {
    let config = EngineConfig::load_from_file(&fixture_path().join("phoenixx.json"))
        .expect("Failed to load config");
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let session = SessionState::start(problem, &clock).expect("Failed to start session");

    // Climb the ladder: nudge, then guide.
    let (session, grant) = session
        .request_hint(HintTier::Nudge, &config, &clock)
        .expect("Nudge should be granted");
    assert_eq!(grant.tier, HintTier::Nudge);
    assert!(!grant.repeated);

    let (session, grant) = session
        .request_hint(HintTier::Guide, &config, &clock)
        .expect("Guide should be granted");
    assert_eq!(grant.tier, HintTier::Guide);

    // Submit a correct solution.
    let mut executor = SolvingExecutor;
    let session = session
        .submit("def solve(): ...", &mut executor, &config, &clock)
        .expect("Submission should be accepted");

    let report = session.latest_report.as_ref().expect("Report missing");
    assert_eq!(report.passed_count, 3);
    assert_eq!(report.total_count, 3);
    // 100 minus nudge (2) and guide (5) penalties
    assert_eq!(report.quality_score, 93);
    assert_eq!(report.overall_score, 93);

    // Finish and verify terminal behavior.
    let finished = session.finish(&clock).expect("Finish should succeed");
    assert!(finished.is_terminal());
    assert_eq!(finished.hints_used(), 2);

    let err = finished
        .submit("again", &mut executor, &config, &clock)
        .expect_err("Submission after finish must fail");
    assert!(matches!(err, EngineError::SessionClosed));
}

/// Tests that skipping ladder tiers is denied without changing state.
#[test]
fn test_hint_ladder_denies_skips() {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let session = SessionState::start(problem, &clock).expect("Failed to start session");

    let err = session
        .request_hint(HintTier::Direction, &config, &clock)
        .expect_err("Direction before nudge must be denied");
    match err {
        EngineError::HintOutOfOrder {
            requested,
            expected,
        } => {
            assert_eq!(requested, HintTier::Direction);
            assert_eq!(expected, HintTier::Nudge);
        }
        other => panic!("Expected HintOutOfOrder, got: {other}"),
    }
    assert_eq!(session.hints_used(), 0);
}

/// Tests that the per-tier grant budget is enforced across a session.
#[test]
fn test_hint_tier_exhaustion() {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let session = SessionState::start(problem, &clock).expect("Failed to start session");
    let (session, _) = session
        .request_hint(HintTier::Nudge, &config, &clock)
        .expect("First nudge");
    let (session, grant) = session
        .request_hint(HintTier::Nudge, &config, &clock)
        .expect("Second nudge");
    assert!(grant.repeated);

    let err = session
        .request_hint(HintTier::Nudge, &config, &clock)
        .expect_err("Third nudge must be denied");
    assert!(matches!(
        err,
        EngineError::HintExhausted {
            tier: HintTier::Nudge
        }
    ));
    assert_eq!(session.hints_used(), 2);
}

/// Tests that one failing case never aborts evaluation of the rest.
#[test]
fn test_case_failure_preserves_partial_credit() {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let session = SessionState::start(problem, &clock).expect("Failed to start session");
    let mut executor = FlakyExecutor;
    let session = session
        .submit("def solve(): ...", &mut executor, &config, &clock)
        .expect("Submission should be accepted");

    let report = session.latest_report.as_ref().expect("Report missing");
    assert_eq!(report.total_count, 3);
    assert_eq!(report.passed_count, 2);
    assert_eq!(report.test_results.len(), 3);

    let failed = &report.test_results[1];
    assert!(!failed.passed);
    let message = failed.error_message.as_deref().expect("Error missing");
    assert!(message.contains("time limit"), "Unexpected message: {message}");

    // 2/3 passed, no hints: floor(100 * 2 / 3) = 66
    assert_eq!(report.quality_score, 66);
}

/// Tests that a resubmission replaces the authoritative report.
#[test]
fn test_resubmission_updates_latest_report() {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let session = SessionState::start(problem, &clock).expect("Failed to start session");

    let mut flaky = FlakyExecutor;
    let session = session
        .submit("attempt one", &mut flaky, &config, &clock)
        .expect("First submission");
    assert_eq!(session.latest_report.as_ref().unwrap().passed_count, 2);

    let mut solving = SolvingExecutor;
    let session = session
        .submit("attempt two", &mut solving, &config, &clock)
        .expect("Second submission");

    assert_eq!(session.submissions.len(), 2);
    assert_eq!(session.latest_report.as_ref().unwrap().passed_count, 3);
    assert_eq!(
        session.latest_submission().unwrap().code,
        "attempt two"
    );
}

/// Tests that operations return new snapshots without mutating the prior one.
#[test]
fn test_snapshot_semantics() {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let original = SessionState::start(problem, &clock).expect("Failed to start session");

    let (with_hint, _) = original
        .request_hint(HintTier::Nudge, &config, &clock)
        .expect("Nudge should be granted");
    assert_eq!(original.hints_used(), 0);
    assert_eq!(with_hint.hints_used(), 1);

    let mut executor = SolvingExecutor;
    let with_submission = with_hint
        .submit("solution", &mut executor, &config, &clock)
        .expect("Submission should be accepted");
    assert!(with_hint.submissions.is_empty());
    assert!(with_hint.latest_report.is_none());
    assert_eq!(with_submission.submissions.len(), 1);
}

/// Tests that elapsed time freezes at the finishing timestamp.
#[test]
fn test_session_duration_is_frozen_by_finish() {
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");

    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).single().unwrap();
    let later = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).single().unwrap();

    let session =
        SessionState::start(problem, &FixedClock::new(start)).expect("Failed to start session");
    let finished = session
        .finish(&FixedClock::new(end))
        .expect("Finish should succeed");

    assert_eq!(finished.elapsed(later).num_minutes(), 30);
}

/// Tests that a finished session survives serialization intact.
#[test]
fn test_session_roundtrips_through_json() {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");
    let clock = clock();

    let session = SessionState::start(problem, &clock).expect("Failed to start session");
    let (session, _) = session
        .request_hint(HintTier::Nudge, &config, &clock)
        .expect("Nudge should be granted");
    let mut executor = SolvingExecutor;
    let session = session
        .submit("solution", &mut executor, &config, &clock)
        .expect("Submission should be accepted");
    let session = session.finish(&clock).expect("Finish should succeed");

    let json = serde_json::to_string(&session).expect("Serialization failed");
    let restored: SessionState = serde_json::from_str(&json).expect("Deserialization failed");

    assert_eq!(restored, session);
    assert!(restored.is_terminal());
    assert_eq!(restored.latest_report.as_ref().unwrap().passed_count, 3);
}
