//! The hook bundle: ordered handler chains keyed by interception event.
//!
//! The runtime calls `pre_tool_use` before every tool call and obeys the
//! returned decision, then calls `post_tool_use` for calls it executed:
//!
//!   PendingToolCall → [pre handlers, in order] → decision
//!     → runtime executes or rejects → [post handlers, in order]
//!
//! The first deny short-circuits the pre chain. A call is never allowed
//! once any handler has denied it.

use std::sync::Arc;

use tracing::{debug, warn};

use docgate_contracts::{
    decision::HookDecision,
    role::AgentRole,
    tool::{CompletedToolCall, PendingToolCall},
};

use crate::traits::{PostToolHandler, PreToolHandler};

/// The assembled interception handlers for one agent instance.
///
/// Created once per agent run and dropped when the run ends. Handlers hold
/// their logger and schema by reference, so dropping the bundle never closes
/// a log the caller still owns.
pub struct HookBundle {
    role: AgentRole,
    pre: Vec<Arc<dyn PreToolHandler>>,
    post: Vec<Arc<dyn PostToolHandler>>,
}

impl HookBundle {
    /// An empty bundle for `role`: allows everything, observes nothing.
    pub fn new(role: AgentRole) -> Self {
        Self {
            role,
            pre: Vec::new(),
            post: Vec::new(),
        }
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Append a handler to the before-execution chain.
    pub fn push_pre(&mut self, handler: Arc<dyn PreToolHandler>) {
        self.pre.push(handler);
    }

    /// Append a handler to the after-execution chain.
    pub fn push_post(&mut self, handler: Arc<dyn PostToolHandler>) {
        self.post.push(handler);
    }

    /// Names of the pre-call handlers, in run order.
    pub fn pre_handlers(&self) -> Vec<&'static str> {
        self.pre.iter().map(|h| h.name()).collect()
    }

    /// Names of the post-call handlers, in run order.
    pub fn post_handlers(&self) -> Vec<&'static str> {
        self.post.iter().map(|h| h.name()).collect()
    }

    /// Run the before-execution chain for `call`.
    ///
    /// Must be called, and its decision honored, before the tool's side
    /// effect happens.
    pub fn pre_tool_use(&self, call: &PendingToolCall) -> HookDecision {
        for handler in &self.pre {
            if let HookDecision::Deny { reason } = handler.before(call) {
                warn!(
                    role = %self.role,
                    tool = %call.tool_name,
                    tool_use_id = %call.tool_use_id,
                    handler = handler.name(),
                    %reason,
                    "tool call denied"
                );
                for observer in &self.pre {
                    observer.denied(call, &reason);
                }
                return HookDecision::Deny { reason };
            }
        }

        debug!(
            role = %self.role,
            tool = %call.tool_name,
            tool_use_id = %call.tool_use_id,
            "tool call allowed"
        );
        HookDecision::Allow
    }

    /// Run the after-execution chain for `call`.
    pub fn post_tool_use(&self, call: &CompletedToolCall) {
        for handler in &self.post {
            handler.after(call);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use docgate_contracts::{
        decision::HookDecision,
        role::AgentRole,
        tool::{CompletedToolCall, PendingToolCall, ToolUseId},
    };

    use crate::traits::{PostToolHandler, PreToolHandler};

    use super::HookBundle;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A pre handler that returns a fixed decision and records what it saw.
    struct Scripted {
        name: &'static str,
        decision: HookDecision,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl PreToolHandler for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn before(&self, _call: &PendingToolCall) -> HookDecision {
            self.seen.lock().unwrap().push(format!("before:{}", self.name));
            self.decision.clone()
        }

        fn denied(&self, _call: &PendingToolCall, reason: &str) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("denied:{}:{}", self.name, reason));
        }
    }

    struct Observer {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl PostToolHandler for Observer {
        fn name(&self) -> &'static str {
            "observer"
        }

        fn after(&self, call: &CompletedToolCall) {
            self.seen.lock().unwrap().push(format!("after:{}", call.tool_name));
        }
    }

    fn scripted(
        name: &'static str,
        decision: HookDecision,
        seen: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<Scripted> {
        Arc::new(Scripted {
            name,
            decision,
            seen: Arc::clone(seen),
        })
    }

    fn call() -> PendingToolCall {
        PendingToolCall::new(ToolUseId::new("t1"), "Write", json!({ "file_path": "x" }))
    }

    // ── Tests ────────────────────────────────────────────────────────────────

    /// An empty bundle allows every call.
    #[test]
    fn empty_bundle_allows() {
        let bundle = HookBundle::new(AgentRole::ClarityValidation);
        assert_eq!(bundle.pre_tool_use(&call()), HookDecision::Allow);
        assert!(bundle.pre_handlers().is_empty());
    }

    /// Handlers run in push order and all run when everyone allows.
    #[test]
    fn handlers_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bundle = HookBundle::new(AgentRole::Extraction);
        bundle.push_pre(scripted("first", HookDecision::Allow, &seen));
        bundle.push_pre(scripted("second", HookDecision::Allow, &seen));

        assert!(bundle.pre_tool_use(&call()).is_allowed());
        assert_eq!(*seen.lock().unwrap(), vec!["before:first", "before:second"]);
        assert_eq!(bundle.pre_handlers(), vec!["first", "second"]);
    }

    /// The first deny stops the chain and every pre handler hears about it.
    #[test]
    fn deny_short_circuits_and_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bundle = HookBundle::new(AgentRole::Extraction);
        bundle.push_pre(scripted("logger", HookDecision::Allow, &seen));
        bundle.push_pre(scripted("gate", HookDecision::deny("nope"), &seen));
        bundle.push_pre(scripted("never", HookDecision::Allow, &seen));

        let decision = bundle.pre_tool_use(&call());
        assert_eq!(decision, HookDecision::deny("nope"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "before:logger",
                "before:gate",
                "denied:logger:nope",
                "denied:gate:nope",
                "denied:never:nope",
            ]
        );
    }

    /// Post handlers observe completed calls.
    #[test]
    fn post_chain_observes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bundle = HookBundle::new(AgentRole::Extraction);
        bundle.push_post(Arc::new(Observer { seen: Arc::clone(&seen) }));

        bundle.post_tool_use(&CompletedToolCall::succeeded(call(), json!({})));
        assert_eq!(*seen.lock().unwrap(), vec!["after:Write"]);
        assert_eq!(bundle.post_handlers(), vec!["observer"]);
    }
}
