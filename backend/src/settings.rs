//! Runtime settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{ParseTransitionPolicyError, StatusTransitions, TransitionPolicy};

/// Settings read from `CIVIC_*` environment variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CIVIC")]
pub struct CivicSettings {
    /// Report status transition policy: `permissive` or `forward_only`.
    pub status_transitions: Option<String>,
    /// Emit JSON log lines instead of plain text.
    #[ortho_config(default = true)]
    pub log_json: bool,
}

impl CivicSettings {
    /// Parse the configured policy, defaulting to permissive.
    pub fn policy(&self) -> Result<TransitionPolicy, ParseTransitionPolicyError> {
        self.status_transitions
            .as_deref()
            .map_or(Ok(TransitionPolicy::default()), str::parse)
    }

    /// Transition table for the configured policy.
    pub fn transitions(&self) -> Result<StatusTransitions, ParseTransitionPolicyError> {
        self.policy().map(TransitionPolicy::table)
    }
}
