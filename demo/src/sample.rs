//! Built-in extraction scenario.
//!
//! Drives four calls for one document through the extraction hooks: a valid
//! analysis write, a write missing `total_examples`, a write outside the
//! output directory, and a read of the accepted file.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use docgate_audit::{LoggerStats, RunLogLayout, ValidationTracker};
use docgate_contracts::{error::DocgateResult, role::AgentRole};
use docgate_hooks::HookComposer;

use crate::runtime::{CallOutcome, ScriptedCall, ScriptedRuntime};

pub const SAMPLE_DOCUMENT: &str = "quickstart.md";

pub struct SampleReport {
    pub outcomes: Vec<CallOutcome>,
    pub stats: LoggerStats,
}

/// A complete document analysis for `page`.
pub fn analysis_payload(page: &str) -> Value {
    json!({
        "page": page,
        "library": "requests",
        "version": "2.32",
        "language": "python",
        "signatures": [{
            "library": "requests",
            "function": "get",
            "method_chain": null,
            "params": ["url", "params"],
            "param_types": { "url": "str" },
            "defaults": { "params": "None" },
            "imports": "import requests",
            "line": 12,
            "context": "Quickstart",
            "raw_code": "requests.get(url, params=None)"
        }],
        "examples": [{
            "library": "requests",
            "language": "python",
            "code": "import requests\nrequests.get('https://example.com')",
            "imports": "import requests",
            "has_main": false,
            "is_executable": true,
            "line": 14,
            "context": "Quickstart",
            "dependencies": ["requests"]
        }],
        "processed_at": "2026-10-14T09:00:00Z",
        "total_signatures": 1,
        "total_examples": 1,
        "warnings": [],
        "processing_time_ms": 42
    })
}

/// A `Write` call placing `payload` at `path`.
pub fn write(path: &Path, payload: &Value) -> ScriptedCall {
    ScriptedCall::new(
        "Write",
        json!({ "file_path": path.display().to_string(), "content": payload.to_string() }),
    )
}

pub fn run(run_dir: &Path) -> DocgateResult<SampleReport> {
    let role = AgentRole::Extraction;
    let output_dir = run_dir.join("results").join(role.as_str());
    let layout = RunLogLayout::new(run_dir);
    let logger = Arc::new(layout.open_logger(role, SAMPLE_DOCUMENT)?);
    let tracker = Arc::new(ValidationTracker::new(layout.validation_log_dir()));
    let hooks = HookComposer::compose_tracked(
        role,
        Some(logger.clone()),
        Some(output_dir.clone()),
        Some(tracker),
    );

    let accepted = output_dir.join("quickstart_analysis.json");
    let mut incomplete = analysis_payload("quickstart");
    if let Some(fields) = incomplete.as_object_mut() {
        fields.remove("total_examples");
    }

    let calls = vec![
        write(&accepted, &analysis_payload("quickstart")),
        write(&output_dir.join("partial_analysis.json"), &incomplete),
        write(
            &run_dir.join("elsewhere").join("quickstart_analysis.json"),
            &analysis_payload("quickstart"),
        ),
        ScriptedCall::new("Read", json!({ "file_path": accepted.display().to_string() })),
    ];

    let outcomes = ScriptedRuntime::new(&hooks).run(calls);
    let stats = logger.get_stats();
    layout.write_summary(role, 1, stats)?;
    Ok(SampleReport { outcomes, stats })
}
