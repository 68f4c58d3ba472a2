//! Markdown report generation for interview sessions.
//!
//! This module provides the [`MarkdownGenerator`] struct for converting a
//! [`SessionReport`] into a human-readable Markdown document. The generated
//! report includes:
//!
//! - A summary table with score and timing metrics
//! - Per-case results from the latest submission
//! - Hints used during the session
//!
//! # Example
//!
//! ```rust
//! use phoenixx_report::{SessionReport, ReportSummary, SessionOutcome, MarkdownGenerator};
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
//! let generator = MarkdownGenerator::new(&report);
//! let markdown = generator.generate();
//! assert!(markdown.contains("# Interview Report"));
//! ```

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::{CaseResult, HintUsage, SessionReport};

/// Maximum length for case output in the results table.
const MAX_OUTPUT_DISPLAY_LENGTH: usize = 80;

/// Generates Markdown reports from interview session results.
///
/// The generator takes a reference to a [`SessionReport`] and produces a
/// formatted Markdown string suitable for human review.
pub struct MarkdownGenerator<'a> {
    report: &'a SessionReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    ///
    /// The output includes the title, summary table, per-case results,
    /// hint usage, and a footer with the generation timestamp.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_cases(&mut output);
        self.write_hints(&mut output);
        Self::write_footer(&mut output);

        output
    }

    /// Writes the report title.
    fn write_title(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "# Interview Report: {}\n",
            escape_markdown(&self.report.problem_title)
        );
    }

    /// Writes the summary section with metrics table.
    fn write_summary(&self, output: &mut String) {
        let summary = &self.report.summary;
        let hint_counts = self.report.hint_counts();

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(
            output,
            "| Problem | {} ({}) |",
            escape_markdown(&self.report.problem_id),
            escape_markdown(&self.report.difficulty)
        );
        let _ = writeln!(output, "| Status | {} |", self.report.outcome.description());
        let _ = writeln!(output, "| Overall Score | {}/100 |", summary.overall_score);
        let _ = writeln!(output, "| Quality Score | {}/100 |", summary.quality_score);
        let _ = writeln!(
            output,
            "| Tests Passed | {}/{} |",
            summary.passed_cases, summary.total_cases
        );
        let _ = writeln!(
            output,
            "| Estimated Complexity | {} |",
            escape_markdown(&summary.estimated_complexity)
        );
        let _ = writeln!(
            output,
            "| Hints Used | {} ({} nudge, {} guide, {} direction) |",
            hint_counts.total(),
            hint_counts.nudge,
            hint_counts.guide,
            hint_counts.direction,
        );
        let _ = writeln!(output, "| Hint Penalty | -{} |", summary.hint_penalty);
        let _ = writeln!(output, "| Submissions | {} |", summary.submissions);
        let _ = writeln!(
            output,
            "| Duration | {} |",
            format_duration(summary.duration_seconds)
        );
        let _ = writeln!(output);
    }

    /// Writes the per-case results section.
    fn write_cases(&self, output: &mut String) {
        let _ = writeln!(output, "## Test Results\n");

        if self.report.cases.is_empty() {
            let _ = writeln!(output, "*No submissions were scored.*\n");
            return;
        }

        let _ = writeln!(output, "| Case | Result | Output | Error |");
        let _ = writeln!(output, "|------|--------|--------|-------|");

        for case in &self.report.cases {
            Self::write_case_entry(output, case);
        }

        let _ = writeln!(output);
    }

    /// Writes a single case result row.
    fn write_case_entry(output: &mut String, case: &CaseResult) {
        let result = if case.passed {
            // Green check / red cross as HTML entities for portability
            "&#9989; pass"
        } else {
            "&#10060; fail"
        };

        let case_output = escape_markdown(&truncate_output(
            &case.actual_output,
            MAX_OUTPUT_DISPLAY_LENGTH,
        ));
        let error = case
            .error
            .as_deref()
            .map(escape_markdown)
            .unwrap_or_default();

        let index = case.index + 1;
        let _ = writeln!(output, "| #{index} | {result} | {case_output} | {error} |");
    }

    /// Writes the hint usage section.
    fn write_hints(&self, output: &mut String) {
        let _ = writeln!(output, "## Hints Used\n");

        if self.report.hints.is_empty() {
            let _ = writeln!(output, "*No hints were used.*\n");
            return;
        }

        let _ = writeln!(output, "| # | Tier | Requested At |");
        let _ = writeln!(output, "|---|------|--------------|");

        for (index, hint) in self.report.hints.iter().enumerate() {
            Self::write_hint_entry(output, index + 1, hint);
        }

        let _ = writeln!(output);
    }

    /// Writes a single hint usage row.
    fn write_hint_entry(output: &mut String, number: usize, hint: &HintUsage) {
        let tier = escape_markdown(&hint.tier);
        let time = format_timestamp(&hint.requested_at);
        let _ = writeln!(output, "| {number} | {tier} | {time} |");
    }

    /// Writes the report footer.
    fn write_footer(output: &mut String) {
        let _ = writeln!(output, "---");
        let timestamp = format_timestamp(&Utc::now());
        let _ = writeln!(output, "*Generated by Phoenixx at {timestamp}*");
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Formats a duration in seconds to a human-readable string.
///
/// Examples:
/// - 65 seconds -> "1m 5s"
/// - 3661 seconds -> "1h 1m 1s"
/// - 45 seconds -> "45s"
fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();

    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}

/// Formats a timestamp to a human-readable string.
///
/// Format: "YYYY-MM-DD HH:MM:SS UTC"
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes special Markdown characters in text.
///
/// This prevents case output from being interpreted as Markdown formatting.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '(' | ')' | '!' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => {
                // Replace newlines with <br> for table cells
                result.push_str("<br>");
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Truncates output to a maximum length, adding an ellipsis if needed.
/// Uses character boundaries to avoid panics on multibyte UTF-8 characters.
fn truncate_output(output: &str, max_length: usize) -> String {
    let first_line = output.lines().next().unwrap_or("");

    if first_line.len() <= max_length {
        first_line.to_string()
    } else {
        let truncate_at = first_line
            .char_indices()
            .take_while(|(idx, _)| *idx < max_length)
            .last()
            .map_or(0, |(idx, c)| idx + c.len_utf8());
        format!("{}...", &first_line[..truncate_at])
    }
}

// ============================================================================
// Tests
// ============================================================================
