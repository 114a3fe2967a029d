//! Per-gate validation tracking.
//!
//! Every schema check a gate performs, passed or failed, is appended as one
//! block to `<log_dir>/<hook_type>_calls.txt`:
//!
//! ```text
//! ================================================================================
//! Timestamp: 2026-10-14T09:00:00.123456+02:00
//! Hook Type: extraction_validation
//! File: quickstart_analysis.json
//! Status: FAILED
//!
//! Reason: Schema validation failed
//!
//! Validation Errors:
//!   - Missing required field: 'total_examples'
//! ================================================================================
//! ```
//!
//! Like the audit sinks, tracking never fails the check it records.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tracing::warn;

use docgate_contracts::verdict::ValidationVerdict;

const RULE: &str =
    "================================================================================";

/// Appends one block per gated check to a per-hook-type text file.
pub struct ValidationTracker {
    log_dir: PathBuf,
    write_lock: Mutex<()>,
    checks_logged: AtomicU64,
    logging_errors: AtomicU64,
}

impl ValidationTracker {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            write_lock: Mutex::new(()),
            checks_logged: AtomicU64::new(0),
            logging_errors: AtomicU64::new(0),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// The file checks of `hook_type` are appended to.
    pub fn calls_log(&self, hook_type: &str) -> PathBuf {
        self.log_dir.join(format!("{hook_type}_calls.txt"))
    }

    /// Append the outcome of one check of `filename`.
    pub fn record(&self, hook_type: &str, filename: &str, verdict: &ValidationVerdict) {
        let block = render_block(hook_type, filename, verdict);
        let path = self.calls_log(hook_type);

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match append(&path, block.as_bytes()) {
            Ok(()) => {
                self.checks_logged.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.logging_errors.fetch_add(1, Ordering::Relaxed);
                warn!(path = %path.display(), error = %e, "validation tracking write failed");
            }
        }
    }

    pub fn checks_logged(&self) -> u64 {
        self.checks_logged.load(Ordering::Relaxed)
    }

    pub fn logging_errors(&self) -> u64 {
        self.logging_errors.load(Ordering::Relaxed)
    }
}

fn render_block(hook_type: &str, filename: &str, verdict: &ValidationVerdict) -> String {
    let mut block = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(block, "\n{RULE}");
    let _ = writeln!(block, "Timestamp: {}", Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z"));
    let _ = writeln!(block, "Hook Type: {hook_type}");
    let _ = writeln!(block, "File: {filename}");
    if verdict.passed {
        let _ = writeln!(block, "Status: PASSED");
    } else {
        let _ = writeln!(block, "Status: FAILED");
        let _ = writeln!(block, "\nReason: Schema validation failed");
        let _ = writeln!(block, "\nValidation Errors:");
        for violation in &verdict.violations {
            let _ = writeln!(block, "  - {violation}");
        }
    }
    let _ = writeln!(block, "{RULE}");
    block
}

fn append(path: &Path, block: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use docgate_contracts::verdict::{ValidationVerdict, Violation};

    use super::ValidationTracker;

    /// Passed and failed checks both land in the hook type's file.
    #[test]
    fn records_pass_and_fail_blocks() {
        let tmp = tempfile::tempdir().unwrap();
        let tracker = ValidationTracker::new(tmp.path().join("validation_hooks"));

        tracker.record("extraction_validation", "a_analysis.json", &ValidationVerdict::pass());
        tracker.record(
            "extraction_validation",
            "b_analysis.json",
            &ValidationVerdict::from_violations(vec![Violation::MissingField {
                path: "total_examples".into(),
            }]),
        );

        let text = std::fs::read_to_string(tracker.calls_log("extraction_validation")).unwrap();
        assert_eq!(text.matches("Hook Type: extraction_validation").count(), 2);
        assert!(text.contains("File: a_analysis.json\nStatus: PASSED"));
        assert!(text.contains("File: b_analysis.json\nStatus: FAILED"));
        assert!(text.contains("  - Missing required field: 'total_examples'"));
        assert_eq!(tracker.checks_logged(), 2);
        assert_eq!(tracker.logging_errors(), 0);
    }

    /// An unwritable directory is counted, not raised.
    #[test]
    fn unwritable_dir_is_counted() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let tracker = ValidationTracker::new(blocker.join("nested"));
        tracker.record("validation_output", "x_validation.json", &ValidationVerdict::pass());
        assert_eq!(tracker.checks_logged(), 0);
        assert_eq!(tracker.logging_errors(), 1);
    }
}
