//! Schema check results.
//!
//! A `ValidationVerdict` explains a gated write in full: every violation is
//! collected before the verdict is returned, so a denial lists everything the
//! agent has to fix rather than only the first problem.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single reason a candidate payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The payload is not parseable as JSON.
    Unparseable { reason: String },

    /// A required field is absent. `path` is dotted with list indices,
    /// e.g. `examples[2].code`.
    MissingField { path: String },

    /// A field is present but holds the wrong kind of value.
    WrongShape { path: String, message: String },

    /// The write target resolves outside the expected output directory.
    OutsideOutputDir { target: String, output_dir: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unparseable { reason } => write!(f, "Invalid JSON: {reason}"),
            Violation::MissingField { path } => write!(f, "Missing required field: '{path}'"),
            Violation::WrongShape { path, message } => write!(f, "Field '{path}': {message}"),
            Violation::OutsideOutputDir { target, output_dir } => {
                write!(f, "Files must be created in {output_dir}, not {target}")
            }
        }
    }
}

/// The result of checking one candidate payload against one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// True only if `violations` is empty.
    pub passed: bool,
    /// Violations in check order. Empty on pass.
    pub violations: Vec<Violation>,
}

impl ValidationVerdict {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }

    pub fn pass() -> Self {
        Self::from_violations(Vec::new())
    }

    /// All violations joined into one human-readable line.
    pub fn summary(&self) -> String {
        self.summary_capped(usize::MAX)
    }

    /// The first `limit` violations joined, then `(+N more)` for the rest.
    pub fn summary_capped(&self, limit: usize) -> String {
        let mut line = self
            .violations
            .iter()
            .take(limit)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        let hidden = self.violations.len().saturating_sub(limit);
        if hidden > 0 {
            line.push_str(&format!(" (+{hidden} more)"));
        }
        line
    }
}
