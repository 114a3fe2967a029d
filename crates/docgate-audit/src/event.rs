//! Audit line and statistics types.
//!
//! `LoggedToolCall` is one line of the structured sink: a `ToolCallRecord`
//! flattened together with its position in the logger's hash chain.
//! `LoggerStats` is the counter snapshot returned by `AuditLogger::get_stats`.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use docgate_contracts::tool::ToolCallRecord;

/// A single structured line, as written to and read back from `tools.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedToolCall {
    /// Position in this logger's chain, starting at 0. Monotonic per logger.
    pub sequence: u64,

    #[serde(flatten)]
    pub record: ToolCallRecord,

    /// `this_hash` of the previous line, or `GENESIS_HASH` for line 0.
    pub prev_hash: String,

    /// SHA-256 (hex) over sequence, prev_hash and the record.
    pub this_hash: String,
}

impl LoggedToolCall {
    /// The `prev_hash` of the first line of every log.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Severity tag of a message-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        })
    }
}

/// Counters for one logger, or summed over several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerStats {
    /// Structured records fully written.
    pub tool_calls_logged: u64,
    /// Message lines fully written.
    pub messages_logged: u64,
    /// Writes to either sink that failed and were swallowed.
    pub logging_errors: u64,
    /// Structured records that carried a tool error.
    pub tool_errors: u64,
}

impl AddAssign for LoggerStats {
    fn add_assign(&mut self, rhs: Self) {
        self.tool_calls_logged += rhs.tool_calls_logged;
        self.messages_logged += rhs.messages_logged;
        self.logging_errors += rhs.logging_errors;
        self.tool_errors += rhs.tool_errors;
    }
}
