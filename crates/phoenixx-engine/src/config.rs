//! Configuration types for the Phoenixx interview engine.
//!
//! This module provides the configuration structures controlling hint
//! policy, scoring penalties, and executor limits. The hint ladder's
//! repeat limit and per-tier penalties are deliberately configuration
//! rather than constants baked into the policy code.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::hint::HintTier;

/// The default config file name.
const CONFIG_FILE_NAME: &str = "phoenixx.json";

/// Default directory containing problem definition files.
fn default_problem_dir() -> String {
    "problems".to_string()
}

/// Default output directory for reports.
fn default_output_dir() -> String {
    ".".to_string()
}

/// Default sandbox image for solution execution.
fn default_sandbox_image() -> String {
    "phoenixx-sandbox:latest".to_string()
}

/// Default number of times a single tier may be granted.
///
/// Two grants model "ask, then ask again / rephrase once".
const fn default_max_grants_per_tier() -> u32 {
    2
}

/// Default wall-clock limit per test case in milliseconds.
const fn default_case_time_limit_ms() -> u64 {
    2000
}

/// Default quality penalty for a nudge hint.
const fn default_nudge_penalty() -> u32 {
    2
}

/// Default quality penalty for a guide hint.
const fn default_guide_penalty() -> u32 {
    5
}

/// Default quality penalty for a direction hint.
const fn default_direction_penalty() -> u32 {
    10
}

/// Main configuration for the Phoenixx engine.
///
/// Controls the hint ladder, scoring penalties, per-case execution limits,
/// and where problems and reports live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Directory containing problem definition JSON files.
    #[serde(default = "default_problem_dir")]
    pub problem_dir: String,

    /// Output directory for generated reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Docker image used to run candidate solutions.
    #[serde(default = "default_sandbox_image")]
    pub sandbox_image: String,

    /// Maximum number of times any single hint tier may be granted.
    #[serde(default = "default_max_grants_per_tier")]
    pub max_grants_per_tier: u32,

    /// Wall-clock limit per test case in milliseconds.
    ///
    /// Exceeding the limit marks only that case as a timeout; it never
    /// aborts the rest of the evaluation.
    #[serde(default = "default_case_time_limit_ms")]
    pub case_time_limit_ms: u64,

    /// Quality-score penalties deducted per granted hint.
    #[serde(default)]
    pub hint_penalties: HintPenalties,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            problem_dir: default_problem_dir(),
            output_dir: default_output_dir(),
            sandbox_image: default_sandbox_image(),
            max_grants_per_tier: default_max_grants_per_tier(),
            case_time_limit_ms: default_case_time_limit_ms(),
            hint_penalties: HintPenalties::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `phoenixx.json` in the current directory. If found, loads
    /// and validates the configuration. If not found, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            EngineError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ConfigParseError` if the file exists but
    /// contains invalid JSON, or `EngineError::ConfigValidationError` if
    /// the values are invalid (e.g. zero grant limit, empty paths).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(EngineError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| EngineError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.max_grants_per_tier == 0 {
            return Err(EngineError::config_validation(
                "maxGrantsPerTier must be greater than 0",
                "Set maxGrantsPerTier to at least 1 in your phoenixx.json",
            ));
        }

        if self.case_time_limit_ms == 0 {
            return Err(EngineError::config_validation(
                "caseTimeLimitMs must be greater than 0",
                "Set caseTimeLimitMs to at least 1 millisecond in your phoenixx.json",
            ));
        }

        if self.problem_dir.trim().is_empty() {
            return Err(EngineError::config_validation(
                "problemDir must not be empty",
                "Provide a valid problem directory path in your phoenixx.json",
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(EngineError::config_validation(
                "outputDir must not be empty",
                "Provide a valid output directory path in your phoenixx.json (use '.' for current directory)",
            ));
        }

        if self.sandbox_image.trim().is_empty() {
            return Err(EngineError::config_validation(
                "sandboxImage must not be empty",
                "Provide a Docker image reference in your phoenixx.json",
            ));
        }

        Ok(())
    }

    /// Returns the per-case time limit as a `Duration`.
    #[must_use]
    pub const fn case_time_limit(&self) -> Duration {
        Duration::from_millis(self.case_time_limit_ms)
    }
}

/// Per-tier quality-score penalties.
///
/// Each granted hint deducts its tier's penalty from the eventual quality
/// score, including repeat grants of the same tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintPenalties {
    /// Penalty for a nudge (gentle push).
    #[serde(default = "default_nudge_penalty")]
    pub nudge: u32,

    /// Penalty for a guide (specific guidance).
    #[serde(default = "default_guide_penalty")]
    pub guide: u32,

    /// Penalty for a direction (full implementation path).
    #[serde(default = "default_direction_penalty")]
    pub direction: u32,
}

impl Default for HintPenalties {
    fn default() -> Self {
        Self {
            nudge: default_nudge_penalty(),
            guide: default_guide_penalty(),
            direction: default_direction_penalty(),
        }
    }
}

impl HintPenalties {
    /// Returns the penalty for a single grant of the given tier.
    #[must_use]
    pub const fn for_tier(&self, tier: HintTier) -> u32 {
        match tier {
            HintTier::Nudge => self.nudge,
            HintTier::Guide => self.guide,
            HintTier::Direction => self.direction,
        }
    }
}
