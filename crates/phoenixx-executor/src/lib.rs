//! Phoenixx Sandbox Executor
//!
//! Docker-backed solution execution via bollard.
//!
//! This crate implements the engine's `Executor` contract: each test case
//! runs the candidate's solution in a fresh, network-less container with
//! the case input on stdin, and reports captured output, wall-clock time,
//! and per-case failures (timeout, runtime error) back to scoring.

mod blocking;
mod sandbox;

pub use blocking::BlockingSandbox;
pub use sandbox::SandboxExecutor;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur managing the sandbox itself.
///
/// Per-case execution failures are not represented here; those are folded
/// into the engine's `ExecutionError` so a failing case never aborts an
/// evaluation.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Failed to connect to the Docker daemon.
    #[error("docker is not available: {0}\n\nSuggestion: Make sure Docker is installed and the daemon is running (try 'docker info')")]
    DockerUnavailable(String),

    /// Docker API error.
    #[error("docker API error: {0}")]
    DockerApi(#[from] bollard::errors::Error),

    /// Failed to prepare the sandbox work directory.
    #[error("failed to prepare work directory '{path}': {message}")]
    WorkDir {
        /// The work directory path.
        path: String,
        /// Description of the failure.
        message: String,
    },

    /// Failed to build the internal async runtime for the blocking adapter.
    #[error("failed to build executor runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Languages the sandbox knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python 3 (default).
    #[default]
    Python,
    /// Node.js.
    JavaScript,
}

impl Language {
    /// File name the solution is written to inside the sandbox mount.
    #[must_use]
    pub const fn solution_file_name(self) -> &'static str {
        match self {
            Self::Python => "solution.py",
            Self::JavaScript => "solution.js",
        }
    }

    /// Interpreter invocation for the solution file.
    #[must_use]
    pub fn interpreter(self) -> &'static str {
        match self {
            Self::Python => "python3",
            Self::JavaScript => "node",
        }
    }

    /// Parses a language name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "python" | "python3" | "py" => Some(Self::Python),
            "javascript" | "js" | "node" => Some(Self::JavaScript),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::JavaScript => write!(f, "javascript"),
        }
    }
}
