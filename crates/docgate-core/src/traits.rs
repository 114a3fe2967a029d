//! Handler traits for the two interception events.
//!
//! A handler is a capability (it logs, or it validates) rather than a hook
//! "type". The composer picks the capabilities an agent role needs and
//! pushes them into a `HookBundle` in the order they must run.

use docgate_contracts::{
    decision::HookDecision,
    tool::{CompletedToolCall, PendingToolCall},
};

/// A handler invoked before the runtime executes a tool call.
///
/// Handlers must return promptly: no retries, no polling, no network I/O.
pub trait PreToolHandler: Send + Sync {
    /// Short stable name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Decide whether `call` may proceed.
    fn before(&self, call: &PendingToolCall) -> HookDecision;

    /// Told that some handler in the chain denied `call`.
    ///
    /// Called on every pre-call handler, including the one that denied. The
    /// default does nothing.
    fn denied(&self, _call: &PendingToolCall, _reason: &str) {}
}

/// A handler invoked after the runtime executed a tool call. Observation only.
pub trait PostToolHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn after(&self, call: &CompletedToolCall);
}
