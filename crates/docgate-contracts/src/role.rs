//! Agent roles recognized by the hook composer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocgateError;

/// The kind of document-processing agent a hook bundle is built for.
///
/// The role decides which gated schema, if any, applies to the agent's
/// writes. The string forms are the ones used in configuration files and
/// log directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Extracts signatures and examples; writes `*_analysis.json`.
    Extraction,
    /// Validates documented API signatures; writes `*_validation.json`.
    ApiValidation,
    /// Executes documented code examples; writes `*_validation.json`.
    CodeValidation,
    /// Scores documentation clarity. No gated output.
    ClarityValidation,
    /// Measures API coverage. No gated output.
    ApiCompleteness,
}

impl AgentRole {
    /// Every recognized role, in declaration order.
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Extraction,
        AgentRole::ApiValidation,
        AgentRole::CodeValidation,
        AgentRole::ClarityValidation,
        AgentRole::ApiCompleteness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Extraction => "extraction",
            AgentRole::ApiValidation => "api_validation",
            AgentRole::CodeValidation => "code_validation",
            AgentRole::ClarityValidation => "clarity_validation",
            AgentRole::ApiCompleteness => "api_completeness",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = DocgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DocgateError::UnknownAgentRole {
                role: s.to_string(),
            })
    }
}
