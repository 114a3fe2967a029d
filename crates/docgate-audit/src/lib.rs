//! # docgate-audit
//!
//! A complete, replayable audit trail of every tool call an agent makes.
//!
//! ## Overview
//!
//! [`AuditLogger`] owns two append-only destinations for one document's
//! run: a human-readable message log and a JSON-lines tool log. Every tool
//! log line links to the previous one via its SHA-256 hash, so a log that was
//! edited or truncated in the middle fails [`verify_chain`] on replay.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docgate_audit::{AuditLogger, LogLevel, RunLogLayout};
//!
//! let layout = RunLogLayout::new("runs/2026-10-14");
//! let logger = layout.open_logger(AgentRole::Extraction, "quickstart.md")?;
//! logger.log_message("starting extraction", LogLevel::Info);
//! logger.log_tool_call(&ToolCallRecord::pre_call(&call));
//! layout.write_summary(AgentRole::Extraction, 1, logger.get_stats())?;
//! ```

pub mod chain;
pub mod event;
pub mod layout;
pub mod logger;
pub mod sink;
pub mod tracking;

pub use chain::{hash_record, read_tool_log, recover_tool_log, verify_chain, RecoveredToolLog};
pub use event::{LogLevel, LoggedToolCall, LoggerStats};
pub use layout::{DocumentLogPaths, RunLogLayout, RunSummary};
pub use logger::{AuditLogger, Destination};
pub use sink::{AtomicLines, Truncate};
pub use tracking::ValidationTracker;

// ── Tests ─────────────────────────────────────────────────────────────────────
