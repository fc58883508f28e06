// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! The compiled container-lab descriptor: the output of the Topology Compiler
//! ([`crate::domain::compiler`]) and the input to the Descriptor Writer
//! ([`crate::application::descriptor_writer`]) and the Lab Driver
//! ([`crate::infrastructure::lab_driver`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Image elected for a node by container type.
pub const IMAGE_ROUTER: &str = "frrouting/frr:latest";
pub const IMAGE_HOST: &str = "alpine:latest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub kind: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exec: Vec<String>,
}

impl NodeDescriptor {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            kind: "linux".to_string(),
            image: image.into(),
            exec: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkDescriptor {
    /// Always exactly two entries of the form `"<node-id>:<iface>"`.
    pub endpoints: [String; 2],
}

impl LinkDescriptor {
    pub fn new(from_id: &str, from_if: &str, to_id: &str, to_if: &str) -> Self {
        Self {
            endpoints: [format!("{from_id}:{from_if}"), format!("{to_id}:{to_if}")],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopologyBlock {
    /// A `BTreeMap` rather than a `HashMap`: serialization key order must be
    /// stable so two compilations of an unchanged topology are byte-exact.
    pub nodes: BTreeMap<String, NodeDescriptor>,
    pub links: Vec<LinkDescriptor>,
}

/// The top-level container-lab descriptor document. Field order matches the
/// wire format the external lab engine expects exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabDescriptor {
    pub name: String,
    pub topology: TopologyBlock,
}

impl LabDescriptor {
    /// Render as the deterministic, sorted YAML document container-lab
    /// expects. `serde_yaml` preserves struct field declaration order and
    /// `BTreeMap` key order, so two compilations of the same topology produce
    /// byte-identical output.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A reason an endpoint or connection was dropped during compilation. The
/// compiler never fails outright; every skip it takes is recorded here
/// instead of aborting the whole compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompileSkip {
    /// A subnet or site id had no elected gateway router to resolve through.
    UnresolvedEndpoint { raw_id: String },
    /// A connection referenced a container id that doesn't exist anywhere
    /// in the topology.
    ForeignConnectionEndpoint { raw_id: String },
}

/// Output of [`crate::domain::compiler::compile`]: the descriptor plus every
/// skip taken while producing it.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub descriptor: LabDescriptor,
    pub skips: Vec<CompileSkip>,
}
