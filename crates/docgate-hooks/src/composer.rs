//! Hook bundle assembly per agent role.
//!
//! Pure wiring: the composer decides which capabilities an agent role gets
//! and in what order, and holds no state of its own.
//!
//! | role                                  | pre chain            | post chain |
//! |---------------------------------------|----------------------|------------|
//! | `extraction`                          | audit?, extraction gate | audit?  |
//! | `api_validation`, `code_validation`   | audit?, validation gate | audit?  |
//! | `clarity_validation`, `api_completeness` | audit?            | audit?     |

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use docgate_audit::{AuditLogger, ValidationTracker};
use docgate_contracts::{error::DocgateResult, role::AgentRole};
use docgate_core::HookBundle;
use docgate_schema::Schema;

use crate::{
    config::HookConfig,
    handlers::{AuditHandler, SchemaGate},
};

/// Builds `HookBundle`s.
pub struct HookComposer;

impl HookComposer {
    /// Build the bundle for the role named `agent_role`.
    ///
    /// # Errors
    ///
    /// `UnknownAgentRole` if `agent_role` is not a recognized role.
    pub fn build(
        agent_role: &str,
        logger: Option<Arc<AuditLogger>>,
        output_dir: Option<PathBuf>,
    ) -> DocgateResult<HookBundle> {
        let role: AgentRole = agent_role.parse()?;
        Ok(Self::compose(role, logger, output_dir))
    }

    /// Build the bundle described by `config`, tracking gate results when
    /// `validation_log_dir` is set.
    pub fn from_config(
        config: &HookConfig,
        logger: Option<Arc<AuditLogger>>,
    ) -> DocgateResult<HookBundle> {
        let role: AgentRole = config.agent_role.parse()?;
        let tracker = config
            .validation_log_dir
            .as_ref()
            .map(|dir| Arc::new(ValidationTracker::new(dir.clone())));
        Ok(Self::compose_tracked(role, logger, config.output_dir.clone(), tracker))
    }

    /// Build the bundle for an already-parsed role. Cannot fail.
    pub fn compose(
        role: AgentRole,
        logger: Option<Arc<AuditLogger>>,
        output_dir: Option<PathBuf>,
    ) -> HookBundle {
        Self::compose_tracked(role, logger, output_dir, None)
    }

    /// Like `compose`, with every schema check also recorded by `tracker`.
    pub fn compose_tracked(
        role: AgentRole,
        logger: Option<Arc<AuditLogger>>,
        output_dir: Option<PathBuf>,
        tracker: Option<Arc<ValidationTracker>>,
    ) -> HookBundle {
        let mut bundle = HookBundle::new(role);

        if let Some(logger) = logger {
            let audit = Arc::new(AuditHandler::new(logger));
            bundle.push_pre(audit.clone());
            bundle.push_post(audit);
        }

        if let Some(schema) = gated_schema(role) {
            let mut gate = SchemaGate::new(schema, output_dir);
            if let (Some(tracker), Some(hook_type)) = (tracker, validation_hook_type(role)) {
                gate = gate.with_tracker(tracker, hook_type);
            }
            bundle.push_pre(Arc::new(gate));
        }

        info!(
            role = %role,
            pre = ?bundle.pre_handlers(),
            post = ?bundle.post_handlers(),
            "hook bundle composed"
        );
        bundle
    }
}

/// The schema an agent role's writes are gated by, if any.
pub fn gated_schema(role: AgentRole) -> Option<Schema> {
    match role {
        AgentRole::Extraction => Some(Schema::Extraction),
        AgentRole::ApiValidation | AgentRole::CodeValidation => Some(Schema::ValidationOutput),
        AgentRole::ClarityValidation | AgentRole::ApiCompleteness => None,
    }
}

/// Name a role's gate results are tracked under, if the role is gated.
pub fn validation_hook_type(role: AgentRole) -> Option<&'static str> {
    match role {
        AgentRole::Extraction => Some("extraction_validation"),
        AgentRole::ApiValidation => Some("api_signature_validation"),
        AgentRole::CodeValidation => Some("code_example_validation"),
        AgentRole::ClarityValidation | AgentRole::ApiCompleteness => None,
    }
}
