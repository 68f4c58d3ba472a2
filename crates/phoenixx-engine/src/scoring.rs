//! Submission scoring for the Phoenixx interview engine.
//!
//! Evaluation is deterministic and separated from the execution mechanism:
//! the engine knows nothing about sandboxes or language runtimes, only the
//! injected [`Executor`] does. Given the same problem, code, hint log, and
//! executor behavior, [`evaluate`] always produces an identical report.
//!
//! Output comparison uses exact, case-sensitive equality after trimming
//! leading and trailing whitespace, which also absorbs newline-style
//! differences at the edges.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, HintPenalties};
use crate::hint::HintRecord;
use crate::problem::Problem;

// ============================================================================
// Executor collaborator
// ============================================================================

/// Successful execution of a submission against one test input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Captured stdout of the run.
    pub output: String,

    /// Wall-clock time the run took, when the executor measures it.
    ///
    /// Complexity estimation is skipped when timing is absent.
    pub elapsed: Option<Duration>,
}

/// Failure of a single test-case execution.
///
/// Scoped to one case: the failing case is recorded as not passed and
/// evaluation continues, so partial credit is always computable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct ExecutionError {
    /// Classification of the failure.
    pub kind: ExecutionErrorKind,
    /// Human-readable detail (compiler output, traceback, ...).
    pub detail: String,
}

impl ExecutionError {
    /// Creates a new `ExecutionError`.
    #[must_use]
    pub fn new(kind: ExecutionErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Creates a timeout error for the given limit.
    #[must_use]
    pub fn timeout(limit: Duration) -> Self {
        Self::new(
            ExecutionErrorKind::Timeout,
            format!("exceeded time limit of {}ms", limit.as_millis()),
        )
    }
}

/// Kinds of per-case execution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionErrorKind {
    /// The run exceeded its wall-clock limit.
    Timeout,
    /// The run crashed or exited non-zero.
    RuntimeError,
    /// The submission failed to compile or parse.
    CompileError,
}

impl std::fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::RuntimeError => write!(f, "runtime error"),
            Self::CompileError => write!(f, "compile error"),
        }
    }
}

/// External sandboxed code runner, injected into evaluation.
///
/// Implementations may block for up to the given time limit per call;
/// exceeding it must be reported as an [`ExecutionErrorKind::Timeout`]
/// for that case only.
pub trait Executor {
    /// Runs `code` against `input` and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] scoped to this single case.
    fn run(
        &mut self,
        code: &str,
        input: &str,
        time_limit: Duration,
    ) -> std::result::Result<Execution, ExecutionError>;
}

// ============================================================================
// Score report
// ============================================================================

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Index of the test case in the problem's ordered set.
    pub test_case_index: usize,

    /// Whether the trimmed output matched the expected output exactly.
    pub passed: bool,

    /// Raw output produced by the run (empty on execution failure).
    pub actual_output: String,

    /// Present when the executor reported a failure for this case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Coarse asymptotic complexity classes derivable from timing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Runtime does not grow with input size.
    Constant,
    /// Runtime grows roughly linearly with input size.
    Linear,
    /// Runtime grows roughly quadratically with input size.
    Quadratic,
    /// Not enough timed samples to estimate, or growth fits no class.
    #[default]
    Unknown,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant => write!(f, "O(1)"),
            Self::Linear => write!(f, "O(n)"),
            Self::Quadratic => write!(f, "O(n^2)"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Derived scoring for one submission. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Per-case outcomes, in test-case order.
    pub test_results: Vec<TestResult>,

    /// Number of passed cases.
    pub passed_count: usize,

    /// Total number of cases.
    pub total_count: usize,

    /// Complexity estimated from execution timing, if available.
    pub estimated_complexity: Complexity,

    /// Correctness score after hint penalties, clamped to 0..=100.
    pub quality_score: u8,

    /// Overall score; equals `quality_score` under the default weighting.
    pub overall_score: u8,
}

/// Pluggable overall-score weighting.
///
/// Leaves room for time-bonus schemes without touching evaluation; the
/// default keeps overall equal to quality.
pub trait Weighting {
    /// Derives the overall score from a report and the session's elapsed time.
    fn overall(&self, report: &ScoreReport, elapsed: chrono::Duration) -> u8;
}

/// Default weighting: overall score is the quality score unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityOnly;

impl Weighting for QualityOnly {
    fn overall(&self, report: &ScoreReport, _elapsed: chrono::Duration) -> u8 {
        report.quality_score
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Normalizes an output string for comparison.
///
/// Trims leading and trailing whitespace; preserves internal whitespace
/// and case.
fn normalize_output(output: &str) -> &str {
    output.trim()
}

/// Sums the quality penalty for every granted hint in the log.
#[must_use]
pub fn penalty_from_hints(hints: &[HintRecord], penalties: &HintPenalties) -> u32 {
    hints.iter().map(|h| penalties.for_tier(h.tier)).sum()
}

/// Evaluates a submission against the problem's fixed test-case set.
///
/// Every test case is executed even when earlier ones fail, so partial
/// credit is always computable. A per-case [`ExecutionError`] marks only
/// that case as failed, with the error message carried into its result.
#[must_use]
pub fn evaluate(
    problem: &Problem,
    code: &str,
    hints: &[HintRecord],
    executor: &mut dyn Executor,
    config: &EngineConfig,
) -> ScoreReport {
    let time_limit = config.case_time_limit();
    let mut test_results = Vec::with_capacity(problem.test_cases.len());
    let mut samples: Vec<(usize, Duration)> = Vec::new();
    let mut passed_count = 0usize;

    for (index, case) in problem.test_cases.iter().enumerate() {
        match executor.run(code, &case.input, time_limit) {
            Ok(execution) => {
                let passed = normalize_output(&execution.output)
                    == normalize_output(&case.expected_output);
                if passed {
                    passed_count += 1;
                }
                if let Some(elapsed) = execution.elapsed {
                    samples.push((case.input.len(), elapsed));
                }
                debug!(case = index, passed, "Test case evaluated");
                test_results.push(TestResult {
                    test_case_index: index,
                    passed,
                    actual_output: execution.output,
                    error_message: None,
                });
            }
            Err(error) => {
                debug!(case = index, kind = %error.kind, "Test case execution failed");
                test_results.push(TestResult {
                    test_case_index: index,
                    passed: false,
                    actual_output: String::new(),
                    error_message: Some(error.to_string()),
                });
            }
        }
    }

    let total_count = problem.test_cases.len();
    let quality_score = quality_score(
        passed_count,
        total_count,
        penalty_from_hints(hints, &config.hint_penalties),
    );

    ScoreReport {
        estimated_complexity: estimate_complexity(&samples),
        test_results,
        passed_count,
        total_count,
        quality_score,
        overall_score: quality_score,
    }
}

/// Re-derives the overall score of a report under a different weighting.
#[must_use]
pub fn reweight(
    report: &ScoreReport,
    weighting: &dyn Weighting,
    elapsed: chrono::Duration,
) -> ScoreReport {
    let mut reweighted = report.clone();
    reweighted.overall_score = weighting.overall(report, elapsed);
    reweighted
}

/// Computes `clamp(0, 100, 100 * passed / total - penalty)`.
fn quality_score(passed: usize, total: usize, penalty: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let base = (100 * passed / total) as i64;
    let score = base - i64::from(penalty);
    u8::try_from(score.clamp(0, 100)).unwrap_or(0)
}

/// Growth-ratio tolerance for complexity classification.
const GROWTH_TOLERANCE: f64 = 1.5;

/// Estimates asymptotic complexity from (input size, elapsed) samples.
///
/// Requires at least three samples with strictly increasing input sizes;
/// the time growth between the smallest and largest sample is compared
/// against constant, linear, and quadratic size growth with a tolerance
/// factor. Anything else is `Unknown`. This is a coarse empirical fit,
/// never a guess from source text.
#[must_use]
pub fn estimate_complexity(samples: &[(usize, Duration)]) -> Complexity {
    if samples.len() < 3 {
        return Complexity::Unknown;
    }

    let mut sorted: Vec<(usize, Duration)> = samples.to_vec();
    sorted.sort_by_key(|(size, _)| *size);
    let strictly_growing = sorted.windows(2).all(|pair| pair[0].0 < pair[1].0);
    if !strictly_growing {
        return Complexity::Unknown;
    }

    let (first_size, first_time) = sorted[0];
    let (last_size, last_time) = sorted[sorted.len() - 1];
    if first_size == 0 || first_time.is_zero() {
        return Complexity::Unknown;
    }

    let size_ratio = last_size as f64 / first_size as f64;
    let time_ratio = last_time.as_secs_f64() / first_time.as_secs_f64();

    if time_ratio <= GROWTH_TOLERANCE {
        Complexity::Constant
    } else if time_ratio <= size_ratio * GROWTH_TOLERANCE {
        Complexity::Linear
    } else if time_ratio <= size_ratio * size_ratio * GROWTH_TOLERANCE {
        Complexity::Quadratic
    } else {
        Complexity::Unknown
    }
}
