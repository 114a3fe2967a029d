//! TOML hook configuration.
//!
//! ```toml
//! agent_role = "extraction"
//! output_dir = "runs/2026-10-14/results/extraction"
//! run_dir = "runs/2026-10-14"
//! validation_log_dir = "runs/2026-10-14/logs/validation_hooks"
//! ```
//!
//! `agent_role` stays a string here so an unknown role surfaces as
//! `UnknownAgentRole` when the bundle is built, not as a parse error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use docgate_contracts::error::{DocgateError, DocgateResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    pub agent_role: String,

    /// Directory gated writes must land in. Omit to skip the location check.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Root of the run's log layout. Omit to run without audit logging.
    #[serde(default)]
    pub run_dir: Option<PathBuf>,

    /// Directory gate results are tracked in. Omit to skip tracking.
    #[serde(default)]
    pub validation_log_dir: Option<PathBuf>,
}

impl HookConfig {
    pub fn from_toml_str(s: &str) -> DocgateResult<Self> {
        toml::from_str(s).map_err(|e| DocgateError::ConfigError {
            reason: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> DocgateResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DocgateError::ConfigError {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }
}
