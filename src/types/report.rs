//! Consistency run results
//!
//! A [`Report`] is an ordered list of [`PairResult`]s, one per
//! (fixture, provider) pair that was attempted, in fixture-major,
//! provider-minor order.

use crate::errors::{ErrorKind, ProviderError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
}

/// Structured reason for a failing pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Provider value disagrees with the fixture
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },
    /// Provider could not return a record at all
    FetchFailed { kind: ErrorKind, message: String },
}

impl Diagnostic {
    pub fn mismatch(
        field: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Diagnostic::FieldMismatch {
            field: field.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Field name for mismatches, `None` for fetch failures
    pub fn field(&self) -> Option<&str> {
        match self {
            Diagnostic::FieldMismatch { field, .. } => Some(field),
            Diagnostic::FetchFailed { .. } => None,
        }
    }
}

impl From<&ProviderError> for Diagnostic {
    fn from(err: &ProviderError) -> Self {
        Diagnostic::FetchFailed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FieldMismatch {
                field,
                expected,
                actual,
            } => write!(f, "{}: expected {}, got {}", field, expected, actual),
            Diagnostic::FetchFailed { kind, message } => write!(f, "{}: {}", kind, message),
        }
    }
}

/// Outcome of one (fixture, provider) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairResult {
    /// 1-based position of the fixture in its set
    pub fixture_index: usize,
    pub txid: String,
    pub provider: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl PairResult {
    /// Build a result from collected diagnostics; empty means Pass
    pub fn from_diagnostics(
        fixture_index: usize,
        txid: impl Into<String>,
        provider: impl Into<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let outcome = if diagnostics.is_empty() {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        Self {
            fixture_index,
            txid: txid.into(),
            provider: provider.into(),
            outcome,
            diagnostics,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

impl fmt::Display for PairResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {} [{}]: ", self.fixture_index, self.provider)?;
        match self.outcome {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => {
                write!(f, "FAIL")?;
                for (i, diagnostic) in self.diagnostics.iter().enumerate() {
                    let sep = if i == 0 { " " } else { "; " };
                    write!(f, "{}{}", sep, diagnostic)?;
                }
                Ok(())
            }
        }
    }
}

/// Aggregated results of a consistency run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub results: Vec<PairResult>,
    /// Run was stopped before every pair was attempted
    #[serde(default)]
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub aborted: bool,
}

impl Report {
    pub fn total_pairs(&self) -> usize {
        self.results.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PairResult> {
        self.results.iter().filter(|r| !r.is_pass())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// A run succeeds iff its failure list is empty
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn summary(&self) -> ReportSummary {
        let failed = self.failure_count();
        ReportSummary {
            total: self.total_pairs(),
            passed: self.total_pairs() - failed,
            failed,
            aborted: self.aborted,
        }
    }

    /// One line per pair followed by a summary line
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            out.push_str(&result.to_string());
            out.push('\n');
        }
        let summary = self.summary();
        out.push_str(&format!(
            "{} pairs: {} passed, {} failed{}\n",
            summary.total,
            summary.passed,
            summary.failed,
            if summary.aborted { " (aborted)" } else { "" }
        ));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
