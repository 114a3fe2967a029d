//! The two handler capabilities: audit logging and schema gating.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use docgate_audit::{AuditLogger, LogLevel, ValidationTracker};
use docgate_contracts::{
    decision::HookDecision,
    tool::{CompletedToolCall, PendingToolCall, ToolCallRecord},
};
use docgate_core::traits::{PostToolHandler, PreToolHandler};
use docgate_schema::{is_write_tool, GatedArtifact, Schema, SchemaValidator};

/// Writes every call, result and denial to an `AuditLogger`.
///
/// Always allows: logging is observation, never a gate.
pub struct AuditHandler {
    logger: Arc<AuditLogger>,
}

impl AuditHandler {
    pub fn new(logger: Arc<AuditLogger>) -> Self {
        Self { logger }
    }
}

impl PreToolHandler for AuditHandler {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn before(&self, call: &PendingToolCall) -> HookDecision {
        self.logger.log_message(
            &format!("PRE-TOOL: {} ({})", call.tool_name, describe_input(call)),
            LogLevel::Debug,
        );
        self.logger.log_tool_call(&ToolCallRecord::pre_call(call));
        HookDecision::Allow
    }

    fn denied(&self, call: &PendingToolCall, reason: &str) {
        self.logger.log_message(
            &format!("DENIED: {} [{}]: {}", call.tool_name, call.tool_use_id, reason),
            LogLevel::Warning,
        );
        self.logger.log_tool_call(&ToolCallRecord::denied(call, reason));
    }
}

impl PostToolHandler for AuditHandler {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn after(&self, call: &CompletedToolCall) {
        self.logger
            .log_message(&format!("POST-TOOL: {}", call.tool_name), LogLevel::Debug);
        if let Some(error) = call.effective_error() {
            self.logger.log_message(
                &format!("Tool error in {}: {}", call.tool_name, error),
                LogLevel::Error,
            );
        }
        self.logger.log_tool_call(&ToolCallRecord::post_call(call));
    }
}

/// Key parameters of a call, for the message log.
pub fn describe_input(call: &PendingToolCall) -> String {
    let input = &call.tool_input;
    let text = |key: &str, default: &str| -> String {
        match input.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => default.to_string(),
        }
    };

    match call.tool_name.as_str() {
        "Read" => {
            let mut parts = vec![format!("file={}", text("file_path", "unknown"))];
            for key in ["offset", "limit"] {
                if let Some(v) = input.get(key) {
                    parts.push(format!("{key}={v}"));
                }
            }
            parts.join(", ")
        }
        "Write" => {
            let bytes = input.get("content").and_then(Value::as_str).map_or(0, str::len);
            format!("file={}, bytes={}", text("file_path", "unknown"), bytes)
        }
        "Bash" => {
            let command: String = text("command", "").chars().take(100).collect();
            format!("cmd='{command}'")
        }
        "Glob" | "Grep" => format!(
            "pattern='{}', path={}",
            text("pattern", ""),
            text("path", "cwd")
        ),
        _ => match input.as_object() {
            Some(map) if !map.is_empty() => {
                let keys: Vec<&str> = map.keys().take(3).map(String::as_str).collect();
                format!("params={keys:?}")
            }
            _ => "no params".to_string(),
        },
    }
}

/// Violations quoted in a deny reason; the rest are counted.
pub const MAX_REASON_VIOLATIONS: usize = 3;

/// Denies gated writes whose payload fails `schema`.
///
/// Only writes to artifacts whose filename maps to this gate's schema are
/// checked. Everything else passes through untouched.
pub struct SchemaGate {
    schema: Schema,
    output_dir: Option<PathBuf>,
    validator: SchemaValidator,
    tracker: Option<(Arc<ValidationTracker>, &'static str)>,
}

impl SchemaGate {
    pub fn new(schema: Schema, output_dir: Option<PathBuf>) -> Self {
        Self {
            schema,
            output_dir,
            validator: SchemaValidator::new(),
            tracker: None,
        }
    }

    /// Record every check this gate makes under `hook_type`.
    pub fn with_tracker(mut self, tracker: Arc<ValidationTracker>, hook_type: &'static str) -> Self {
        self.tracker = Some((tracker, hook_type));
        self
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }
}

impl PreToolHandler for SchemaGate {
    fn name(&self) -> &'static str {
        "schema_gate"
    }

    fn before(&self, call: &PendingToolCall) -> HookDecision {
        if !is_write_tool(&call.tool_name) {
            return HookDecision::Allow;
        }
        let Some(file_path) = call.input_str("file_path") else {
            return HookDecision::Allow;
        };
        let target = Path::new(file_path);
        let Some(artifact) = GatedArtifact::classify(target) else {
            return HookDecision::Allow;
        };
        if artifact.schema() != self.schema {
            debug!(
                file = %file_path,
                artifact_schema = artifact.schema().id(),
                gate_schema = self.schema.id(),
                "artifact belongs to another schema, not gated here"
            );
            return HookDecision::Allow;
        }

        let content = call.input_str("content").unwrap_or_default();
        let verdict =
            self.validator
                .validate(content, self.schema, target, self.output_dir.as_deref());
        let filename = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.to_string());
        if let Some((tracker, hook_type)) = &self.tracker {
            tracker.record(hook_type, &filename, &verdict);
        }

        if verdict.passed {
            debug!(file = %file_path, schema = self.schema.id(), "gated write passed validation");
            return HookDecision::Allow;
        }
        HookDecision::deny(format!(
            "Schema validation failed for {filename}: {}",
            verdict.summary_capped(MAX_REASON_VIOLATIONS)
        ))
    }
}
