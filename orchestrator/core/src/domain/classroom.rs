// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Classroom-layer value types: an instructor session, a per-student slot
//! cloned off a template topology, and the one-use code a student redeems to
//! reach their slot's topology. CRUD persistence of these types and the
//! student login exchange live outside this crate (see
//! [`crate::domain::repository`]); only the shapes and the clone-and-mint
//! operation ([`crate::application::classroom_service::instantiate`]) belong
//! here.

use serde::{Deserialize, Serialize};

use super::topology::NodeId;

/// A one-use code redeemed by a student to reach their slot's topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCode(pub String);

impl JoinCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An instructor-owned session: a name and the template topology every
/// student slot is cloned from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: NodeId,
    pub name: String,
    pub template_topology_id: NodeId,
}

/// One student's clone of the session template, reachable only via its
/// `join_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSlot {
    pub session_id: NodeId,
    pub topology_id: NodeId,
    pub label: String,
    pub join_code: JoinCode,
}
