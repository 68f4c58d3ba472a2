//! Phoenixx Report Generation
//!
//! This crate provides types and utilities for generating reports from
//! completed interview sessions. Reports can be serialized to JSON for
//! programmatic access or rendered to Markdown for human review.
//!
//! # Types
//!
//! - [`SessionReport`] - The complete report structure for one session
//! - [`ReportSummary`] - High-level score and timing summary
//! - [`CaseResult`] - The outcome of a single test case
//! - [`HintUsage`] - A hint granted during the session
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - Generate JSON reports with compact or pretty formatting
//! - [`MarkdownGenerator`] - Generate human-readable Markdown reports
//!
//! # Example
//!
//! ```rust
//! use phoenixx_report::{SessionReport, ReportSummary, SessionOutcome, CaseResult};
//! use phoenixx_report::json::JsonGenerator;
//!
//! let report = SessionReport {
//!     problem_id: "two-sum".to_string(),
//!     problem_title: "Two Sum".to_string(),
//!     difficulty: "easy".to_string(),
//!     outcome: SessionOutcome::Completed,
//!     summary: ReportSummary {
//!         overall_score: 95,
//!         quality_score: 95,
//!         passed_cases: 3,
//!         total_cases: 3,
//!         estimated_complexity: "O(n)".to_string(),
//!         hint_penalty: 5,
//!         submissions: 2,
//!         duration_seconds: 1800,
//!     },
//!     cases: vec![CaseResult {
//!         index: 0,
//!         passed: true,
//!         actual_output: "0 1".to_string(),
//!         error: None,
//!     }],
//!     hints: vec![],
//! };
//!
//! // Generate JSON report
//! let generator = JsonGenerator::new(&report);
//! let json = generator.generate_pretty().unwrap();
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid report data.
    #[error("invalid report data: {0}")]
    InvalidData(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Session Outcome (local copy to avoid cross-crate dependency)
// ============================================================================

/// Final state of the session when the report was generated.
///
/// This is a local copy of the session's terminal state from the engine
/// crate to keep report generation free of engine dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The session was still open when the report was generated.
    #[default]
    InProgress,
    /// The candidate finished the session.
    Completed,
    /// The session ended without a finishing call.
    Abandoned,
}

impl SessionOutcome {
    /// Returns `true` if the session reached a terminal state.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    /// Returns a human-readable description of the outcome.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InProgress => "Session in progress",
            Self::Completed => "Session completed",
            Self::Abandoned => "Session abandoned",
        }
    }
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// SessionReport
// ============================================================================

/// Complete interview session report.
///
/// This is the top-level structure containing everything about one
/// session: the problem attempted, the score summary, per-case results
/// from the latest submission, and the hints the candidate used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionReport {
    /// Identifier of the problem attempted.
    pub problem_id: String,

    /// Display title of the problem.
    pub problem_title: String,

    /// Difficulty label of the problem.
    pub difficulty: String,

    /// Final state of the session.
    pub outcome: SessionOutcome,

    /// High-level score and timing summary.
    pub summary: ReportSummary,

    /// Per-case results from the latest scored submission.
    pub cases: Vec<CaseResult>,

    /// Hints granted during the session, in request order.
    pub hints: Vec<HintUsage>,
}

impl SessionReport {
    /// Creates a new report builder.
    #[must_use]
    pub fn builder() -> SessionReportBuilder {
        SessionReportBuilder::default()
    }

    /// Serializes the report to JSON.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Serialization` if JSON serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ReportError::from)
    }

    /// Returns `true` if every case in the latest submission passed.
    #[must_use]
    pub fn all_cases_passed(&self) -> bool {
        !self.cases.is_empty() && self.cases.iter().all(|c| c.passed)
    }

    /// Returns the number of hints used at each tier, in ladder order.
    #[must_use]
    pub fn hint_counts(&self) -> HintCounts {
        let mut counts = HintCounts::default();
        for hint in &self.hints {
            match hint.tier.as_str() {
                "nudge" => counts.nudge += 1,
                "guide" => counts.guide += 1,
                "direction" => counts.direction += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Hint counts by ladder tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintCounts {
    /// Number of nudge-tier hints.
    pub nudge: usize,
    /// Number of guide-tier hints.
    pub guide: usize,
    /// Number of direction-tier hints.
    pub direction: usize,
}

impl HintCounts {
    /// Returns the total number of hints.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.nudge + self.guide + self.direction
    }
}

// ============================================================================
// SessionReportBuilder
// ============================================================================

/// Builder for constructing [`SessionReport`] instances.
#[derive(Debug, Clone, Default)]
pub struct SessionReportBuilder {
    problem_id: Option<String>,
    problem_title: Option<String>,
    difficulty: Option<String>,
    outcome: SessionOutcome,
    summary: Option<ReportSummary>,
    cases: Vec<CaseResult>,
    hints: Vec<HintUsage>,
}

impl SessionReportBuilder {
    /// Sets the problem identifier.
    #[must_use]
    pub fn problem_id(mut self, id: impl Into<String>) -> Self {
        self.problem_id = Some(id.into());
        self
    }

    /// Sets the problem title.
    #[must_use]
    pub fn problem_title(mut self, title: impl Into<String>) -> Self {
        self.problem_title = Some(title.into());
        self
    }

    /// Sets the difficulty label.
    #[must_use]
    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    /// Sets the session outcome.
    #[must_use]
    pub const fn outcome(mut self, outcome: SessionOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Sets the score summary.
    #[must_use]
    pub fn summary(mut self, summary: ReportSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Adds a single case result.
    #[must_use]
    pub fn case(mut self, case: CaseResult) -> Self {
        self.cases.push(case);
        self
    }

    /// Sets all case results at once.
    #[must_use]
    pub fn cases(mut self, cases: Vec<CaseResult>) -> Self {
        self.cases = cases;
        self
    }

    /// Adds a single hint usage entry.
    #[must_use]
    pub fn hint(mut self, hint: HintUsage) -> Self {
        self.hints.push(hint);
        self
    }

    /// Sets all hint usage entries at once.
    #[must_use]
    pub fn hints(mut self, hints: Vec<HintUsage>) -> Self {
        self.hints = hints;
        self
    }

    /// Builds the report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidData` if required fields are missing.
    pub fn build(self) -> Result<SessionReport> {
        let problem_id = self
            .problem_id
            .ok_or_else(|| ReportError::InvalidData("problem_id is required".to_string()))?;

        let summary = self
            .summary
            .ok_or_else(|| ReportError::InvalidData("summary is required".to_string()))?;

        Ok(SessionReport {
            problem_id,
            problem_title: self.problem_title.unwrap_or_default(),
            difficulty: self.difficulty.unwrap_or_default(),
            outcome: self.outcome,
            summary,
            cases: self.cases,
            hints: self.hints,
        })
    }
}

// ============================================================================
// ReportSummary
// ============================================================================

/// High-level summary of the session score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Final weighted score, 0 to 100.
    pub overall_score: u8,

    /// Quality score before weighting, 0 to 100.
    pub quality_score: u8,

    /// Number of test cases passed by the latest submission.
    pub passed_cases: usize,

    /// Total number of test cases.
    pub total_cases: usize,

    /// Estimated runtime complexity label, e.g. `O(n)`.
    pub estimated_complexity: String,

    /// Total score penalty from hints used.
    pub hint_penalty: u32,

    /// Number of submissions made during the session.
    pub submissions: usize,

    /// Session duration in seconds.
    pub duration_seconds: u64,
}

impl ReportSummary {
    /// Returns the pass rate as a percentage, or 0 for an empty case set.
    #[must_use]
    pub fn pass_rate(&self) -> u8 {
        if self.total_cases == 0 {
            return 0;
        }
        let rate = self.passed_cases * 100 / self.total_cases;
        u8::try_from(rate).unwrap_or(100)
    }
}

// ============================================================================
// CaseResult
// ============================================================================

/// Outcome of a single test case from the latest submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseResult {
    /// Zero-based index of the test case.
    pub index: usize,

    /// Whether the normalized output matched the expected output.
    pub passed: bool,

    /// Output produced by the solution, empty when execution failed.
    pub actual_output: String,

    /// Execution failure description, if the case did not run to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseResult {
    /// Creates a passing case result.
    #[must_use]
    pub fn passed(index: usize, actual_output: impl Into<String>) -> Self {
        Self {
            index,
            passed: true,
            actual_output: actual_output.into(),
            error: None,
        }
    }

    /// Creates a failing case result with the mismatched output.
    #[must_use]
    pub fn failed(index: usize, actual_output: impl Into<String>) -> Self {
        Self {
            index,
            passed: false,
            actual_output: actual_output.into(),
            error: None,
        }
    }

    /// Creates a case result for an execution failure.
    #[must_use]
    pub fn errored(index: usize, error: impl Into<String>) -> Self {
        Self {
            index,
            passed: false,
            actual_output: String::new(),
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// HintUsage
// ============================================================================

/// A hint granted during the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintUsage {
    /// Ladder tier of the hint: `nudge`, `guide`, or `direction`.
    pub tier: String,

    /// When the hint was requested.
    pub requested_at: DateTime<Utc>,
}

impl HintUsage {
    /// Creates a hint usage entry.
    #[must_use]
    pub fn new(tier: impl Into<String>, requested_at: DateTime<Utc>) -> Self {
        Self {
            tier: tier.into(),
            requested_at,
        }
    }
}
