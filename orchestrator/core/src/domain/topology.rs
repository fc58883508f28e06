// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! The authored, logical network topology: sites containing subnets
//! containing containers, plus three scopes of connection between them.
//!
//! This module only describes shape. It never touches the filesystem, a
//! container engine, or a database — the topology is a pure value the
//! compiler ([`crate::domain::compiler`]) consumes and the authoring layer
//! (out of scope, see [`crate::domain::repository`]) persists.

use serde::{Deserialize, Serialize};

/// An opaque, stable identifier. Shared by sites, subnets, and containers —
/// uniqueness across all three is an invariant of the containing [`Topology`],
/// not something this type enforces on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Container role. Drives image election ([`crate::domain::compiler`]) and
/// gateway election eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerType {
    Router,
    Firewall,
    Switch,
    Workstation,
    WebServer,
    FileServer,
    Plc,
}

impl ContainerType {
    pub fn is_gateway_capable(self) -> bool {
        matches!(self, ContainerType::Router | ContainerType::Firewall)
    }

    pub fn is_switch(self) -> bool {
        matches!(self, ContainerType::Switch)
    }
}

/// A tagged endpoint reference. A connection's `from`/`to` is always one of
/// these three kinds depending on the scope the connection is declared in —
/// never a bare string that could be misclassified during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EndpointRef {
    Container(NodeId),
    Subnet(NodeId),
    Site(NodeId),
}

impl EndpointRef {
    pub fn id(&self) -> &NodeId {
        match self {
            EndpointRef::Container(id) | EndpointRef::Subnet(id) | EndpointRef::Site(id) => id,
        }
    }
}

/// A point-to-point connection between two endpoints in a given scope
/// (intra-subnet, inter-subnet, or inter-site).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: EndpointRef,
    pub to: EndpointRef,
    #[serde(default)]
    pub label: Option<String>,
    /// Explicit interface name claimed on the `from` side, if any.
    #[serde(default)]
    pub from_interface: Option<String>,
    /// Explicit interface name claimed on the `to` side, if any.
    #[serde(default)]
    pub to_interface: Option<String>,
    /// Explicit container-id override for the `from` side — used when a
    /// connection authored at subnet/site scope should still pin to a
    /// specific container rather than resolve to the elected gateway.
    #[serde(default)]
    pub from_container: Option<NodeId>,
    /// Explicit container-id override for the `to` side.
    #[serde(default)]
    pub to_container: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    /// Primary IPv4 address inside its subnet, e.g. `10.0.0.10`.
    pub ip: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// In-container paths marked for persistence (component J).
    #[serde(default)]
    pub persist_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    pub id: NodeId,
    pub name: String,
    /// IPv4 CIDR, e.g. `10.0.0.0/24`.
    pub cidr: String,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Subnet {
    /// Prefix length parsed out of `cidr`, defaulting to /24 the way the
    /// original generator does when the CIDR is malformed.
    pub fn prefix_len(&self) -> &str {
        self.cidr.split('/').nth(1).unwrap_or("24")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    /// Inter-subnet connections scoped to this site.
    #[serde(default)]
    pub subnet_connections: Vec<Connection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Topology {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sites: Vec<Site>,
    /// Inter-site connections scoped to the whole topology.
    #[serde(default)]
    pub site_connections: Vec<Connection>,
}

impl Topology {
    /// `name` or the fallback the original generator uses when a topology is
    /// authored without one.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or("ae3gis-topology")
    }

    /// Every container in the topology, depth-first by site then subnet.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.sites
            .iter()
            .flat_map(|site| site.subnets.iter())
            .flat_map(|subnet| subnet.containers.iter())
    }
}

/// The persisted lifecycle status of a topology record, as tracked by the
/// authoring layer's storage (out of scope here, see
/// [`crate::domain::repository`]) — not derived or guessed by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Idle,
    Deployed,
    Error,
}

impl LifecycleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleStatus::Idle => "idle",
            LifecycleStatus::Deployed => "deployed",
            LifecycleStatus::Error => "error",
        }
    }
}

impl Default for LifecycleStatus {
    fn default() -> Self {
        LifecycleStatus::Idle
    }
}
