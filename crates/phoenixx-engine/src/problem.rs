//! Problem loading and validation for the Phoenixx interview engine.
//!
//! Problems are immutable once loaded: a definition with an id, title,
//! difficulty, prose description, worked examples, and the fixed test-case
//! set every submission is evaluated against.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Maximum allowed problem file size in bytes (100KB).
pub const MAX_PROBLEM_SIZE: u64 = 100 * 1024;

/// A coding problem presented to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Stable identifier (e.g. "two-sum").
    pub id: String,

    /// Human-readable title.
    pub title: String,

    /// Difficulty tier shown to the candidate.
    pub difficulty: Difficulty,

    /// Prose problem statement.
    pub description: String,

    /// Worked examples shown alongside the description.
    #[serde(default)]
    pub examples: Vec<Example>,

    /// Test cases the scoring engine evaluates submissions against.
    pub test_cases: Vec<TestCase>,
}

/// Problem difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Warm-up level.
    Easy,
    /// Standard interview level.
    Medium,
    /// Stretch level.
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// A worked example shown to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Example input, rendered verbatim.
    pub input: String,

    /// Expected output for the example.
    pub output: String,

    /// Optional explanation of why the output follows from the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A single test case in a problem's fixed evaluation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Input fed to the candidate's solution on stdin.
    pub input: String,

    /// Expected output, compared after whitespace trimming.
    pub expected_output: String,
}

impl Problem {
    /// Loads a problem from a JSON file.
    ///
    /// Validates that:
    /// - The file exists
    /// - The file size is within the 100KB limit
    /// - The content is valid UTF-8 and valid problem JSON
    /// - The problem itself is well-formed (see [`Problem::validate`])
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ProblemNotFound` if the file doesn't exist,
    /// `EngineError::ProblemTooLarge` if it exceeds 100KB,
    /// `EngineError::ProblemEncodingError` if it is not valid UTF-8, and
    /// `EngineError::InvalidProblem` if the definition fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::load_from_file(path)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EngineError::problem_not_found(path)
            } else {
                EngineError::Io(e)
            }
        })?;

        let file_size = metadata.len();
        if file_size > MAX_PROBLEM_SIZE {
            return Err(EngineError::problem_too_large(path, file_size / 1024));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                EngineError::problem_encoding(path)
            } else {
                EngineError::Io(e)
            }
        })?;

        let problem: Self = serde_json::from_str(&content).map_err(|e| {
            EngineError::invalid_problem(format!("'{}': {e}", path.display()))
        })?;
        problem.validate()?;
        Ok(problem)
    }

    /// Resolves a problem id against a problem directory and loads it.
    ///
    /// Looks for `<dir>/<id>.json`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Problem::load`].
    pub fn load_by_id(dir: &Path, id: &str) -> Result<Self> {
        Self::load(dir.join(format!("{id}.json")))
    }

    /// Validates the problem definition.
    ///
    /// A problem without test cases can never be scored, so it is rejected
    /// before any session is created over it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidProblem` if the id or title is empty,
    /// or if `test_cases` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_problem("problem id is empty"));
        }
        if self.title.trim().is_empty() {
            return Err(EngineError::invalid_problem("problem title is empty"));
        }
        if self.test_cases.is_empty() {
            return Err(EngineError::invalid_problem(format!(
                "problem '{}' has no test cases",
                self.id
            )));
        }
        Ok(())
    }

    /// Returns the file path a problem with this id would load from.
    #[must_use]
    pub fn path_for_id(dir: &Path, id: &str) -> PathBuf {
        dir.join(format!("{id}.json"))
    }
}
