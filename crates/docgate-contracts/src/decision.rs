//! Permission decisions returned to the runtime by the pre-call chain.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The answer to "may this tool call proceed?".
///
/// On `Deny` the runtime must not perform the tool's side effect and
/// surfaces `reason` to the agent so it can retry with corrected output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookDecision {
    Allow,
    Deny { reason: String },
}

impl HookDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        HookDecision::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, HookDecision::Allow)
    }

    /// Render the decision in the runtime's hook-output wire shape.
    ///
    /// Allow is the empty object; deny carries `hookSpecificOutput`.
    pub fn to_hook_output(&self) -> Value {
        match self {
            HookDecision::Allow => json!({}),
            HookDecision::Deny { reason } => json!({
                "hookSpecificOutput": {
                    "hookEventName": "PreToolUse",
                    "permissionDecision": "deny",
                    "permissionDecisionReason": reason,
                }
            }),
        }
    }
}
