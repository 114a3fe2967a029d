//! On-disk placement of per-document logs and per-role run summaries.
//!
//! ```text
//! <run_dir>/logs/<agent_role>/<doc_stem>_agent.log
//! <run_dir>/logs/<agent_role>/<doc_stem>_tools.jsonl
//! <run_dir>/logs/<agent_role>/summary.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use docgate_contracts::{
    error::{DocgateError, DocgateResult},
    role::AgentRole,
};

use crate::{event::LoggerStats, logger::AuditLogger};

/// The two log files kept for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLogPaths {
    pub agent_log: PathBuf,
    pub tools_log: PathBuf,
}

/// What a role's run produced, written as `summary.json`.
///
/// `stats.logging_errors` is how swallowed logging failures reach the
/// operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub agent_role: AgentRole,
    pub timestamp: DateTime<Utc>,
    pub run_dir: String,
    pub documents_processed: u64,
    pub stats: LoggerStats,
}

/// Directory layout for one run's logs.
#[derive(Debug, Clone)]
pub struct RunLogLayout {
    run_dir: PathBuf,
    logs_dir: PathBuf,
}

impl RunLogLayout {
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        let run_dir = run_dir.into();
        let logs_dir = run_dir.join("logs");
        Self { run_dir, logs_dir }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// `<logs>/validation_hooks/`, where gate results are tracked.
    pub fn validation_log_dir(&self) -> PathBuf {
        self.logs_dir.join("validation_hooks")
    }

    /// `<logs>/<role>/`, created if missing.
    pub fn agent_log_dir(&self, role: AgentRole) -> DocgateResult<PathBuf> {
        let dir = self.logs_dir.join(role.as_str());
        fs::create_dir_all(&dir).map_err(|e| DocgateError::LogSetup {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(dir)
    }

    /// Log paths for `document` (e.g. `docs/quickstart.md` → `quickstart_*`).
    pub fn document_logs(&self, role: AgentRole, document: &str) -> DocgateResult<DocumentLogPaths> {
        let dir = self.agent_log_dir(role)?;
        let stem = Path::new(document)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DocgateError::ConfigError {
                reason: format!("document name '{document}' has no file stem"),
            })?;
        Ok(DocumentLogPaths {
            agent_log: dir.join(format!("{stem}_agent.log")),
            tools_log: dir.join(format!("{stem}_tools.jsonl")),
        })
    }

    /// Open the logger for one document, continuing any earlier chain.
    pub fn open_logger(&self, role: AgentRole, document: &str) -> DocgateResult<AuditLogger> {
        let paths = self.document_logs(role, document)?;
        AuditLogger::open(&paths.agent_log, &paths.tools_log)
    }

    /// Write `<logs>/<role>/summary.json`, replacing any previous summary.
    pub fn write_summary(
        &self,
        role: AgentRole,
        documents_processed: u64,
        stats: LoggerStats,
    ) -> DocgateResult<RunSummary> {
        let path = self.agent_log_dir(role)?.join("summary.json");
        let summary = RunSummary {
            agent_role: role,
            timestamp: Utc::now(),
            run_dir: self.run_dir.display().to_string(),
            documents_processed,
            stats,
        };
        let body = serde_json::to_string_pretty(&summary).map_err(|e| DocgateError::Io {
            reason: e.to_string(),
        })?;
        fs::write(&path, body).map_err(|e| DocgateError::Io {
            reason: format!("{}: {e}", path.display()),
        })?;

        info!(
            role = %role,
            documents_processed,
            tool_calls = stats.tool_calls_logged,
            logging_errors = stats.logging_errors,
            path = %path.display(),
            "run summary written"
        );
        Ok(summary)
    }
}
