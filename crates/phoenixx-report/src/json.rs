//! JSON report generation for interview sessions.
//!
//! This module provides [`JsonGenerator`] for serializing session reports
//! to JSON. Reports can be generated as compact single-line JSON or
//! pretty-printed for human readability.
//!
//! # Example
//!
//! ```rust
//! use phoenixx_report::{SessionReport, ReportSummary, SessionOutcome};
//! use phoenixx_report::json::JsonGenerator;
//!
//! let report = SessionReport {
//!     problem_id: "two-sum".to_string(),
//!     problem_title: "Two Sum".to_string(),
//!     difficulty: "easy".to_string(),
//!     outcome: SessionOutcome::Completed,
//!     summary: ReportSummary::default(),
//!     cases: vec![],
//!     hints: vec![],
//! };
//!
//! let generator = JsonGenerator::new(&report);
//!
//! // Generate compact JSON
//! let compact = generator.generate().unwrap();
//!
//! // Generate pretty-printed JSON
//! let pretty = generator.generate_pretty().unwrap();
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{Result, SessionReport};

/// JSON report generator.
///
/// Wraps a [`SessionReport`] reference and provides methods for
/// serializing it to JSON in various formats.
pub struct JsonGenerator<'a> {
    report: &'a SessionReport,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator for the given report.
    #[must_use]
    pub const fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Generates compact JSON output (single line, no extra whitespace).
    ///
    /// This format is optimal for programmatic consumption.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::Serialization`] if JSON serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.report).map_err(crate::ReportError::from)
    }

    /// Generates pretty-printed JSON output with indentation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::Serialization`] if JSON serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.report).map_err(crate::ReportError::from)
    }

    /// Writes the JSON report directly to a file.
    ///
    /// Creates or overwrites the file at the specified path. Parent
    /// directories must exist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::Serialization`] if JSON serialization
    /// fails and [`crate::ReportError::Io`] if file creation or writing fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
