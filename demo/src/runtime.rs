//! A minimal synchronous agent runtime.
//!
//! Stands in for the real tool-call loop: for each scripted call it asks the
//! hook bundle first, performs the side effect only on allow, then reports
//! the result to the after-execution chain. Denied calls never execute and
//! never reach the after-execution chain.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use docgate_contracts::{
    decision::HookDecision,
    tool::{CompletedToolCall, PendingToolCall, ToolUseId},
};
use docgate_core::HookBundle;

/// One tool call as written in a replay script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedCall {
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Value,
}

impl ScriptedCall {
    pub fn new(tool_name: impl Into<String>, tool_input: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input,
        }
    }
}

/// What happened to one scripted call.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub tool_use_id: ToolUseId,
    pub tool_name: String,
    pub decision: HookDecision,
    /// Set when the call ran; `Err` holds the tool's failure.
    pub result: Option<Result<Value, String>>,
}

pub struct ScriptedRuntime<'a> {
    hooks: &'a HookBundle,
}

impl<'a> ScriptedRuntime<'a> {
    pub fn new(hooks: &'a HookBundle) -> Self {
        Self { hooks }
    }

    pub fn run(&self, calls: Vec<ScriptedCall>) -> Vec<CallOutcome> {
        calls.into_iter().map(|call| self.run_call(call)).collect()
    }

    pub fn run_call(&self, scripted: ScriptedCall) -> CallOutcome {
        let call = PendingToolCall::new(ToolUseId::generate(), scripted.tool_name, scripted.tool_input);
        let decision = self.hooks.pre_tool_use(&call);

        if !decision.is_allowed() {
            return CallOutcome {
                tool_use_id: call.tool_use_id,
                tool_name: call.tool_name,
                decision,
                result: None,
            };
        }

        let result = execute(&call);
        debug!(tool = %call.tool_name, ok = result.is_ok(), "tool executed");
        let tool_use_id = call.tool_use_id.clone();
        let tool_name = call.tool_name.clone();
        let completed = match &result {
            Ok(output) => CompletedToolCall::succeeded(call, output.clone()),
            Err(error) => CompletedToolCall::failed(call, error.clone()),
        };
        self.hooks.post_tool_use(&completed);

        CallOutcome {
            tool_use_id,
            tool_name,
            decision,
            result: Some(result),
        }
    }
}

fn execute(call: &PendingToolCall) -> Result<Value, String> {
    let file_path = || {
        call.input_str("file_path")
            .map(Path::new)
            .ok_or_else(|| format!("{} requires 'file_path'", call.tool_name))
    };

    match call.tool_name.as_str() {
        "Write" => {
            let path = file_path()?;
            let content = call.input_str("content").unwrap_or_default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            fs::write(path, content).map_err(|e| e.to_string())?;
            Ok(json!({
                "type": "text",
                "text": format!("wrote {} bytes to {}", content.len(), path.display()),
            }))
        }
        "Read" => {
            let path = file_path()?;
            let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
            Ok(json!({ "type": "text", "content": content }))
        }
        other => Err(format!("tool '{other}' is not available in the scripted runtime")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use docgate_audit::AuditLogger;
    use docgate_hooks::HookComposer;

    use super::{ScriptedCall, ScriptedRuntime};
    use crate::sample;

    /// Allowed writes reach disk; denied writes never do.
    #[test]
    fn runtime_only_writes_when_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("results");
        let bundle = HookComposer::build("extraction", None, Some(out.clone())).unwrap();
        let runtime = ScriptedRuntime::new(&bundle);

        let good = out.join("good_analysis.json");
        let bad = out.join("bad_analysis.json");
        let mut missing = sample::analysis_payload("bad.md");
        missing.as_object_mut().unwrap().remove("total_examples");

        let outcomes = runtime.run(vec![
            sample::write(&good, &sample::analysis_payload("good.md")),
            sample::write(&bad, &missing),
        ]);

        assert!(outcomes[0].decision.is_allowed());
        assert!(matches!(outcomes[0].result, Some(Ok(_))));
        assert!(good.exists());

        assert!(!outcomes[1].decision.is_allowed());
        assert!(outcomes[1].result.is_none());
        assert!(!bad.exists(), "denied write must not reach disk");
    }

    /// Unsupported tools fail and the failure reaches the post chain.
    #[test]
    fn unsupported_tool_is_reported_as_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = Arc::new(
            AuditLogger::open(&tmp.path().join("a.log"), &tmp.path().join("t.jsonl")).unwrap(),
        );
        let bundle = HookComposer::build("clarity_validation", Some(logger.clone()), None).unwrap();
        let runtime = ScriptedRuntime::new(&bundle);

        let outcome = runtime.run_call(ScriptedCall::new("Bash", json!({ "command": "ls" })));
        assert!(matches!(outcome.result, Some(Err(_))));
        assert_eq!(logger.get_stats().tool_errors, 1);
        assert_eq!(logger.get_stats().tool_calls_logged, 2);
    }

    /// The built-in sample produces one allow-read, one allow-write and two denials.
    #[test]
    fn sample_scenario_outcomes() {
        let tmp = tempfile::tempdir().unwrap();
        let report = sample::run(tmp.path()).unwrap();

        let allowed: Vec<bool> = report.outcomes.iter().map(|o| o.decision.is_allowed()).collect();
        assert_eq!(allowed, vec![true, false, false, true]);
        assert_eq!(report.stats.tool_calls_logged, 8);
        assert!(tmp.path().join("logs/extraction/summary.json").exists());
        assert!(tmp.path().join("logs/extraction/quickstart_tools.jsonl").exists());

        let tracked = std::fs::read_to_string(
            tmp.path().join("logs/validation_hooks/extraction_validation_calls.txt"),
        )
        .unwrap();
        assert_eq!(tracked.matches("Status: PASSED").count(), 1);
        assert_eq!(tracked.matches("Status: FAILED").count(), 2);
    }

    /// Running the sample twice on one run dir leaves a verifiable log.
    #[test]
    fn repeated_sample_runs_keep_chain_intact() {
        let tmp = tempfile::tempdir().unwrap();
        sample::run(tmp.path()).unwrap();
        sample::run(tmp.path()).unwrap();

        let file =
            std::fs::File::open(tmp.path().join("logs/extraction/quickstart_tools.jsonl")).unwrap();
        let lines = docgate_audit::read_tool_log(std::io::BufReader::new(file)).unwrap();
        assert_eq!(lines.len(), 16);
        assert!(docgate_audit::verify_chain(&lines));
    }
}
