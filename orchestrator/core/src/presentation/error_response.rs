// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Maps [`OrchestratorError`] onto HTTP responses, and converts
//! [`ProxyError`] into it — the one module-scoped error whose `From` impl
//! can't live next to the taxonomy itself without `domain` depending on
//! `presentation`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::error::OrchestratorError;
use crate::presentation::reverse_proxy::ProxyError;

impl From<ProxyError> for OrchestratorError {
    fn from(err: ProxyError) -> Self {
        let message = err.to_string();
        match err {
            ProxyError::NotDeployed | ProxyError::NotRunning => OrchestratorError::Conflict(message),
            ProxyError::NoAddress(_) | ProxyError::Upstream(_) => OrchestratorError::BadGateway(message),
        }
    }
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrchestratorError::NotFound(_) => StatusCode::NOT_FOUND,
            OrchestratorError::Unauthenticated => StatusCode::UNAUTHORIZED,
            OrchestratorError::Forbidden(_) => StatusCode::FORBIDDEN,
            OrchestratorError::Conflict(_) => StatusCode::CONFLICT,
            OrchestratorError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            OrchestratorError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestratorError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_not_running_maps_to_conflict() {
        let err: OrchestratorError = ProxyError::NotRunning.into();
        assert!(matches!(err, OrchestratorError::Conflict(_)));
    }

    #[test]
    fn proxy_no_address_maps_to_bad_gateway() {
        let err: OrchestratorError = ProxyError::NoAddress("no address".to_string()).into();
        assert!(matches!(err, OrchestratorError::BadGateway(_)));
    }

    #[test]
    fn not_found_responds_with_404() {
        let response = OrchestratorError::NotFound(crate::domain::topology::NodeId::new("lab-1")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthenticated_responds_with_401_not_403() {
        let response = OrchestratorError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
