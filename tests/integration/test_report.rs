//! Integration tests for report generation from a scored session
//!
//! These tests run a session through the engine with a scripted executor,
//! convert the final state into the report crate's input types, and verify
//! the generated Markdown and JSON artifacts.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use phoenixx_engine::{
    penalty_from_hints, EngineConfig, Execution, ExecutionError, Executor, FixedClock, HintTier,
    Problem, SessionState,
};
use phoenixx_report::{
    json::JsonGenerator, CaseResult, HintUsage, MarkdownGenerator, ReportSummary, SessionOutcome,
    SessionReport,
};

/// Path to the fixture directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Executor that solves the first two fixture cases and misses the third.
struct MostlySolvingExecutor;

impl Executor for MostlySolvingExecutor {
    fn run(
        &mut self,
        _code: &str,
        input: &str,
        _time_limit: Duration,
    ) -> Result<Execution, ExecutionError> {
        let output = match input {
            "2 7 11 15\n9" => "0 1",
            "3 2 4\n6" => "1 2",
            _ => "wrong",
        };
        Ok(Execution {
            output: output.to_string(),
            elapsed: None,
        })
    }
}

/// Runs a session and converts it into a report, mirroring what the CLI
/// does after a run.
fn scored_session_report() -> SessionReport {
    let config = EngineConfig::default();
    let problem = Problem::load_by_id(&fixture_path(), "two-sum").expect("Failed to load problem");

    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 1, 9, 20, 5).single().unwrap();

    let session =
        SessionState::start(problem, &FixedClock::new(start)).expect("Failed to start session");
    let (session, _) = session
        .request_hint(HintTier::Nudge, &config, &FixedClock::new(start))
        .expect("Nudge should be granted");

    let mut executor = MostlySolvingExecutor;
    let session = session
        .submit("attempt", &mut executor, &config, &FixedClock::new(end))
        .expect("Submission should be accepted");
    let session = session
        .finish(&FixedClock::new(end))
        .expect("Finish should succeed");

    convert_session(&session, &config)
}

/// Converts a finished engine session into the report input structure.
fn convert_session(session: &SessionState, config: &EngineConfig) -> SessionReport {
    let report = session.latest_report.as_ref().expect("Report missing");
    let elapsed = session.elapsed(Utc::now());
    let duration_seconds = u64::try_from(elapsed.num_seconds()).unwrap_or(0);

    let summary = ReportSummary {
        overall_score: report.overall_score,
        quality_score: report.quality_score,
        passed_cases: report.passed_count,
        total_cases: report.total_count,
        estimated_complexity: report.estimated_complexity.to_string(),
        hint_penalty: penalty_from_hints(&session.hints, &config.hint_penalties),
        submissions: session.submissions.len(),
        duration_seconds,
    };

    let cases = report
        .test_results
        .iter()
        .map(|result| CaseResult {
            index: result.test_case_index,
            passed: result.passed,
            actual_output: result.actual_output.clone(),
            error: result.error_message.clone(),
        })
        .collect();

    let hints = session
        .hints
        .iter()
        .map(|record| HintUsage::new(record.tier.to_string(), record.requested_at))
        .collect();

    SessionReport::builder()
        .problem_id(&session.problem.id)
        .problem_title(&session.problem.title)
        .difficulty(session.problem.difficulty.to_string())
        .outcome(SessionOutcome::Completed)
        .summary(summary)
        .cases(cases)
        .hints(hints)
        .build()
        .expect("Report build failed")
}

/// Tests that the converted report carries the session's scores.
#[test]
fn test_report_reflects_session_scores() {
    let report = scored_session_report();

    assert_eq!(report.problem_id, "two-sum");
    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.summary.passed_cases, 2);
    assert_eq!(report.summary.total_cases, 3);
    // floor(100 * 2 / 3) = 66, minus the nudge penalty of 2
    assert_eq!(report.summary.quality_score, 64);
    assert_eq!(report.summary.hint_penalty, 2);
    assert_eq!(report.summary.submissions, 1);
    assert_eq!(report.summary.duration_seconds, 1205);
    assert!(!report.all_cases_passed());
}

/// Tests that per-case results and hint usage survive conversion.
#[test]
fn test_report_cases_and_hints() {
    let report = scored_session_report();

    assert_eq!(report.cases.len(), 3);
    assert!(report.cases[0].passed);
    assert!(report.cases[1].passed);
    assert!(!report.cases[2].passed);
    assert_eq!(report.cases[2].actual_output, "wrong");
    assert!(report.cases[2].error.is_none());

    assert_eq!(report.hints.len(), 1);
    assert_eq!(report.hints[0].tier, "nudge");
    assert_eq!(report.hint_counts().nudge, 1);
}

/// Tests the generated Markdown artifact end to end.
#[test]
fn test_markdown_report_contents() {
    let report = scored_session_report();
    let markdown = MarkdownGenerator::new(&report).generate();

    assert!(markdown.contains("# Interview Report: Two Sum"));
    assert!(markdown.contains("| Problem | two-sum (easy) |"));
    assert!(markdown.contains("| Status | Session completed |"));
    assert!(markdown.contains("| Tests Passed | 2/3 |"));
    assert!(markdown.contains("| Hint Penalty | -2 |"));
    assert!(markdown.contains("| Duration | 20m 5s |"));
    assert!(markdown.contains("&#9989; pass"));
    assert!(markdown.contains("&#10060; fail"));
    assert!(markdown.contains("| 1 | nudge |"));
}

/// Tests the generated JSON artifact round-trips with the same content.
#[test]
fn test_json_report_roundtrip() {
    let report = scored_session_report();
    let json = JsonGenerator::new(&report)
        .generate_pretty()
        .expect("JSON generation failed");

    assert!(json.contains("\"problem_id\": \"two-sum\""));
    assert!(json.contains("\"outcome\": \"completed\""));

    let parsed: SessionReport = serde_json::from_str(&json).expect("JSON parse failed");
    assert_eq!(parsed.summary, report.summary);
    assert_eq!(parsed.cases.len(), report.cases.len());
    assert_eq!(parsed.hints.len(), report.hints.len());
}

/// Tests that JSON report files are written to disk.
#[test]
fn test_json_report_written_to_disk() {
    let report = scored_session_report();
    let path = std::env::temp_dir().join("phoenixx-integration-report.json");

    JsonGenerator::new(&report)
        .write_to_file(&path, true)
        .expect("Write failed");

    let contents = std::fs::read_to_string(&path).expect("Read failed");
    assert!(contents.contains("\"problem_title\": \"Two Sum\""));

    std::fs::remove_file(&path).expect("Cleanup failed");
}
