//! Tool invocation types exchanged with the agent runtime.
//!
//! `PendingToolCall` is what the runtime hands to the before-execution
//! handlers; `CompletedToolCall` is what it hands to the after-execution
//! handlers. `ToolCallRecord` is the immutable observation written to the
//! structured sink for either event.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlation identifier shared by the pre- and post-call records of one
/// tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolUseId(pub String);

impl ToolUseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier for runtimes that do not assign one.
    pub fn generate() -> Self {
        Self(format!("toolu_{}", uuid::Uuid::new_v4().simple()))
    }
}

impl fmt::Display for ToolUseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tool call the agent has requested but the runtime has not yet executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingToolCall {
    pub tool_use_id: ToolUseId,
    /// Tool name as the runtime reports it (e.g. "Write", "Read", "Bash").
    pub tool_name: String,
    /// Tool parameters. Opaque to the hook layer except for gated writes.
    pub tool_input: Value,
}

impl PendingToolCall {
    pub fn new(tool_use_id: ToolUseId, tool_name: impl Into<String>, tool_input: Value) -> Self {
        Self {
            tool_use_id,
            tool_name: tool_name.into(),
            tool_input,
        }
    }

    /// String parameter `key` from the tool input, if present.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.tool_input.get(key).and_then(Value::as_str)
    }
}

/// A tool call after the runtime executed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedToolCall {
    pub tool_use_id: ToolUseId,
    pub tool_name: String,
    pub tool_input: Value,
    /// Whatever the tool returned. Absent when the tool failed outright.
    pub tool_output: Option<Value>,
    /// Error reported by the runtime for this call, if any.
    pub error: Option<String>,
}

impl CompletedToolCall {
    /// A call that produced `output`.
    pub fn succeeded(call: PendingToolCall, output: Value) -> Self {
        Self {
            tool_use_id: call.tool_use_id,
            tool_name: call.tool_name,
            tool_input: call.tool_input,
            tool_output: Some(output),
            error: None,
        }
    }

    /// A call that failed with `error` and produced no output.
    pub fn failed(call: PendingToolCall, error: impl Into<String>) -> Self {
        Self {
            tool_use_id: call.tool_use_id,
            tool_name: call.tool_name,
            tool_input: call.tool_input,
            tool_output: None,
            error: Some(error.into()),
        }
    }

    /// The effective error for this call.
    ///
    /// An explicit runtime error wins. Otherwise an output object flagged
    /// `is_error: true` is treated as a failure whose text is its `content`.
    pub fn effective_error(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        let output = self.tool_output.as_ref()?;
        if output.get("is_error").and_then(Value::as_bool) != Some(true) {
            return None;
        }
        Some(match output.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "Unknown error".to_string(),
        })
    }
}

/// Which interception point produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEventKind {
    #[serde(rename = "pre_tool")]
    PreToolUse,
    #[serde(rename = "post_tool")]
    PostToolUse,
}

impl HookEventKind {
    /// The runtime's name for this interception event.
    pub fn event_name(&self) -> &'static str {
        match self {
            HookEventKind::PreToolUse => "PreToolUse",
            HookEventKind::PostToolUse => "PostToolUse",
        }
    }
}

/// One observation of a single tool invocation.
///
/// Created at interception time, serialized immediately, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub timestamp: DateTime<Utc>,
    pub event_type: HookEventKind,
    pub tool_name: String,
    pub tool_input: Value,
    /// Present only on post-call records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<Value>,
    pub tool_use_id: ToolUseId,
    #[serde(default)]
    pub error: Option<String>,
}

impl ToolCallRecord {
    /// The record for a call about to execute.
    pub fn pre_call(call: &PendingToolCall) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: HookEventKind::PreToolUse,
            tool_name: call.tool_name.clone(),
            tool_input: call.tool_input.clone(),
            tool_output: None,
            tool_use_id: call.tool_use_id.clone(),
            error: None,
        }
    }

    /// The record for a call the runtime executed.
    pub fn post_call(call: &CompletedToolCall) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: HookEventKind::PostToolUse,
            tool_name: call.tool_name.clone(),
            tool_input: call.tool_input.clone(),
            tool_output: call.tool_output.clone(),
            tool_use_id: call.tool_use_id.clone(),
            error: call.effective_error(),
        }
    }

    /// The closing record for a call that was denied and never executed.
    pub fn denied(call: &PendingToolCall, reason: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: HookEventKind::PostToolUse,
            tool_name: call.tool_name.clone(),
            tool_input: call.tool_input.clone(),
            tool_output: None,
            tool_use_id: call.tool_use_id.clone(),
            error: Some(format!("permission denied: {reason}")),
        }
    }
}
