// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! The crate-wide error taxonomy every module-scoped error (`EngineError`,
//! `FirewallError`, `SeederError`, `ProcessError`, `AuthError`,
//! `RepositoryError`, ...) converts into at a service boundary, via the
//! `From` impls below. `ProxyError` converts into it too, but that impl
//! lives in [`crate::presentation::error_response`] instead, next to the
//! `IntoResponse` adapter — `domain` doesn't depend on `presentation`.

use thiserror::Error;

use super::repository::{AuthError, RepositoryError};
use super::topology::NodeId;
use crate::infrastructure::firewall::FirewallError;
use crate::infrastructure::lab_driver::EngineError;
use crate::infrastructure::process::ProcessError;
use crate::infrastructure::seeder::SeederError;

/// The outcome categories an orchestrator operation can end in, independent
/// of which component raised it.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("topology {0} not found")]
    NotFound(NodeId),

    #[error("missing or invalid authentication")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("upstream returned an invalid response: {0}")]
    BadGateway(String),

    #[error("lab engine error: {0}")]
    Engine(String),

    #[error("transient failure, retry: {0}")]
    Transient(String),
}

impl OrchestratorError {
    /// Whether a caller should retry the operation unchanged. Only
    /// `Transient` failures are retryable; everything else reflects a
    /// decision that won't change on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrchestratorError::Transient(_))
    }
}

impl From<RepositoryError> for OrchestratorError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => OrchestratorError::NotFound(NodeId::new(id)),
            RepositoryError::Backend(message) => OrchestratorError::Engine(message),
        }
    }
}

impl From<AuthError> for OrchestratorError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => OrchestratorError::Unauthenticated,
            AuthError::Forbidden(topology_id) => {
                OrchestratorError::Forbidden(format!("token does not authorize topology {topology_id}"))
            }
        }
    }
}

impl From<ProcessError> for OrchestratorError {
    fn from(err: ProcessError) -> Self {
        let message = err.to_string();
        match err {
            ProcessError::Timeout { .. } => OrchestratorError::Transient(message),
            ProcessError::Spawn { .. } | ProcessError::NonZeroExit { .. } => OrchestratorError::Engine(message),
        }
    }
}

impl From<EngineError> for OrchestratorError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::Process(source) => source.into(),
            EngineError::RetriesExhausted { .. } => OrchestratorError::Transient(message),
            EngineError::DeployFailed { .. } | EngineError::FileNotFound(_) => OrchestratorError::Engine(message),
        }
    }
}

impl From<FirewallError> for OrchestratorError {
    fn from(err: FirewallError) -> Self {
        let message = err.to_string();
        match err {
            FirewallError::Process(source) => source.into(),
            FirewallError::NoBinary | FirewallError::ListFailed(_) | FirewallError::ApplyFailed(_) => {
                OrchestratorError::Engine(message)
            }
        }
    }
}

impl From<SeederError> for OrchestratorError {
    fn from(err: SeederError) -> Self {
        match err {
            SeederError::Io(source) => OrchestratorError::Engine(source.to_string()),
            SeederError::Process(source) => source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_orchestrator_not_found() {
        let err: OrchestratorError = RepositoryError::NotFound("lab-1".to_string()).into();
        assert!(matches!(err, OrchestratorError::NotFound(id) if id.as_str() == "lab-1"));
    }

    #[test]
    fn auth_unauthenticated_maps_to_unauthenticated_not_forbidden() {
        let err: OrchestratorError = AuthError::Unauthenticated.into();
        assert!(matches!(err, OrchestratorError::Unauthenticated));
    }
}
