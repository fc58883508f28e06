// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Interfaces only. CRUD persistence, the authoring layer, and the
//! token→identity→topology authorization decision are external
//! collaborators this crate calls through but never implements — the
//! concrete repositories and authorizer live in whatever owns the HTTP
//! routing surface and database. Declaring them here lets the streaming
//! components ([`crate::presentation`]) take `Arc<dyn TokenAuthorizer>`
//! without depending on a concrete auth backend.

use async_trait::async_trait;
use thiserror::Error;

use super::classroom::{ClassSession, StudentSlot};
use super::topology::{LifecycleStatus, NodeId, Topology};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait TopologyRepository: Send + Sync {
    async fn load(&self, id: &NodeId) -> Result<Topology, RepositoryError>;
    async fn save(&self, id: &NodeId, topology: &Topology) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &NodeId) -> Result<(), RepositoryError>;
    /// The topology record's persisted lifecycle field (`idle`/`deployed`/
    /// `error`), read independently of `load` so a long-lived status stream
    /// can poll it without re-fetching the whole topology body each tick.
    async fn status(&self, id: &NodeId) -> Result<LifecycleStatus, RepositoryError>;
}

#[async_trait]
pub trait ClassroomRepository: Send + Sync {
    async fn load_session(&self, id: &NodeId) -> Result<ClassSession, RepositoryError>;
    async fn save_session(&self, session: &ClassSession) -> Result<(), RepositoryError>;
    async fn save_slot(&self, slot: &StudentSlot) -> Result<(), RepositoryError>;
    async fn list_slots(&self, session_id: &NodeId) -> Result<Vec<StudentSlot>, RepositoryError>;
    async fn delete_slot(&self, topology_id: &NodeId) -> Result<(), RepositoryError>;
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed token")]
    Unauthenticated,
    #[error("token does not authorize topology {0}")]
    Forbidden(String),
}

/// What a presented token resolves to, beyond bare pass/fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The instructor token: unrestricted access.
    Instructor,
    /// A student-slot token, scoped to exactly one topology.
    Student { topology_id: NodeId },
}

/// The token→identity→topology scoping decision consumed by the Status
/// Streamer, PTY Exec Multiplexer, and Reverse Proxy before they hand off
/// to the engine. None of those components decide policy themselves; they
/// call this and act on the result.
#[async_trait]
pub trait TokenAuthorizer: Send + Sync {
    async fn authorize(&self, token: &str, topology_id: &NodeId) -> Result<AuthOutcome, AuthError>;
}
