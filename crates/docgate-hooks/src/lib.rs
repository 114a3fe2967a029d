//! # docgate-hooks
//!
//! Per-role assembly of the tool-call hooks for document-processing agents.
//!
//! [`HookComposer::build`] combines an optional [`AuditLogger`] with the
//! schema gate the agent role calls for and returns a ready
//! [`HookBundle`](docgate_core::HookBundle):
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docgate_hooks::HookComposer;
//!
//! let logger = Arc::new(layout.open_logger(AgentRole::Extraction, "quickstart.md")?);
//! let hooks = HookComposer::build("extraction", Some(logger.clone()), Some(output_dir))?;
//!
//! // runtime side, around every tool call:
//! let decision = hooks.pre_tool_use(&call);
//! ```
//!
//! [`AuditLogger`]: docgate_audit::AuditLogger

pub mod composer;
pub mod config;
pub mod handlers;

pub use composer::{gated_schema, validation_hook_type, HookComposer};
pub use config::HookConfig;
pub use handlers::{describe_input, AuditHandler, SchemaGate, MAX_REASON_VIOLATIONS};

// ── Tests ─────────────────────────────────────────────────────────────────────
