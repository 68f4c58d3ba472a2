//! Error types for the Phoenixx interview engine.
//!
//! This module defines the error hierarchy for all engine operations,
//! including configuration loading, problem loading, session mutations,
//! and hint policy enforcement.

use std::path::PathBuf;

use crate::hint::HintTier;

/// A specialized `Result` type for Phoenixx engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during interview session processing.
///
/// Every variant is recoverable by the caller: operations return either a
/// new session snapshot or one of these failures, never a panic. Variants
/// include actionable suggestions where possible.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your phoenixx.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Problem Loading Errors
    // ========================================================================
    /// Problem file was not found at the specified path.
    #[error("Problem not found: '{path}'\n\nSuggestion: Check the problem path or the 'problemDir' field in phoenixx.json")]
    ProblemNotFound {
        /// Path where the problem was expected.
        path: PathBuf,
    },

    /// Problem file exceeds the 100KB size limit.
    #[error("Problem exceeds size limit (100KB): '{path}' is {size_kb}KB\n\nSuggestion: Trim the problem description or split oversized test fixtures")]
    ProblemTooLarge {
        /// Path to the oversized problem file.
        path: PathBuf,
        /// Actual size in kilobytes.
        size_kb: u64,
    },

    /// Problem file contains non-UTF-8 content.
    #[error(
        "Problem has invalid encoding: '{path}'\n\nSuggestion: Convert the file to UTF-8 encoding"
    )]
    ProblemEncodingError {
        /// Path to the problem with encoding issues.
        path: PathBuf,
    },

    /// Problem definition is malformed or unusable.
    ///
    /// Rejected at `SessionState::start`; a session can never be created
    /// over a problem that cannot be scored.
    #[error("Invalid problem: {reason}\n\nSuggestion: Every problem needs an id, a title, and at least one test case")]
    InvalidProblem {
        /// Description of what makes the problem invalid.
        reason: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Mutation attempted on a session that has already ended.
    #[error("Session is closed: no further submissions or hints are accepted after finish")]
    SessionClosed,

    // ========================================================================
    // Hint Policy Errors
    // ========================================================================
    /// Requested hint tier is not the next grantable one.
    #[error("Hint out of order: requested '{requested}' but the next grantable tier is '{expected}'")]
    HintOutOfOrder {
        /// The tier that was requested.
        requested: HintTier,
        /// The tier the ladder would grant next.
        expected: HintTier,
    },

    /// Hint tier has been granted its maximum number of times.
    #[error("Hint exhausted: tier '{tier}' has reached its grant limit")]
    HintExhausted {
        /// The exhausted tier.
        tier: HintTier,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `ProblemNotFound` error.
    #[must_use]
    pub fn problem_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ProblemNotFound { path: path.into() }
    }

    /// Creates a new `ProblemTooLarge` error.
    #[must_use]
    pub fn problem_too_large(path: impl Into<PathBuf>, size_kb: u64) -> Self {
        Self::ProblemTooLarge {
            path: path.into(),
            size_kb,
        }
    }

    /// Creates a new `ProblemEncodingError`.
    #[must_use]
    pub fn problem_encoding(path: impl Into<PathBuf>) -> Self {
        Self::ProblemEncodingError { path: path.into() }
    }

    /// Creates a new `InvalidProblem` error.
    #[must_use]
    pub fn invalid_problem(reason: impl Into<String>) -> Self {
        Self::InvalidProblem {
            reason: reason.into(),
        }
    }

    /// Creates a new `HintOutOfOrder` error.
    #[must_use]
    pub const fn hint_out_of_order(requested: HintTier, expected: HintTier) -> Self {
        Self::HintOutOfOrder {
            requested,
            expected,
        }
    }

    /// Creates a new `HintExhausted` error.
    #[must_use]
    pub const fn hint_exhausted(tier: HintTier) -> Self {
        Self::HintExhausted { tier }
    }

    /// Returns `true` if this error is a hint policy denial.
    ///
    /// Denials leave the session untouched; callers surface them as a
    /// no-op with user feedback.
    #[must_use]
    pub const fn is_hint_denial(&self) -> bool {
        matches!(self, Self::HintOutOfOrder { .. } | Self::HintExhausted { .. })
    }

    /// Returns `true` if this error means the attempted mutation was
    /// rejected without changing any session state.
    ///
    /// This holds for every session-facing variant; only I/O and parse
    /// errors during loading fall outside it.
    #[must_use]
    pub const fn leaves_state_unchanged(&self) -> bool {
        matches!(
            self,
            Self::SessionClosed
                | Self::InvalidProblem { .. }
                | Self::HintOutOfOrder { .. }
                | Self::HintExhausted { .. }
        )
    }
}
