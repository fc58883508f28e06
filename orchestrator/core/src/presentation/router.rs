// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Assembles the axum `Router` for the streaming surface this crate owns
//! directly (status stream, PTY exec, reverse proxy). Topology CRUD,
//! classroom CRUD, and auth issuance are the authoring layer's routes and
//! are mounted alongside this one by whatever owns the HTTP server.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::status_stream::{status_stream, StatusStreamState};

/// Builds the router for this crate's streaming endpoints, to be nested
/// under the authoring layer's top-level router.
pub fn router(state: Arc<StatusStreamState>) -> Router {
    Router::new()
        .route("/topologies/{topology_id}/status", get(status_stream))
        .with_state(state)
}
