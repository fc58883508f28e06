// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Runtime configuration shared by every infrastructure component that
//! shells out to the lab engine or container engine. Loaded by the CLI from
//! a YAML file with environment-variable overrides, the way the teacher's
//! global CLI args layer `--config` / `AEGIS_CONFIG_PATH` on top of a
//! serde-deserialized struct.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_lab_engine() -> String {
    "containerlab".to_string()
}

fn default_container_engine() -> String {
    "docker".to_string()
}

fn default_workdir() -> PathBuf {
    PathBuf::from("/var/lib/ae3gis/labs")
}

/// Process-wide settings for the Driver, Firewall Controller, Persistence
/// Seeder, and Reverse Proxy. The Reverse Proxy's upstream port is not
/// configurable here: it's always 80, per the fixed `http://<ip>:80/<path>`
/// upstream URL the proxy builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Directory holding per-topology descriptor files and seeder metadata.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,
    /// Lab-engine binary name or path (e.g. `containerlab`).
    #[serde(default = "default_lab_engine")]
    pub lab_engine_binary: String,
    /// Container-engine binary name or path (e.g. `docker`).
    #[serde(default = "default_container_engine")]
    pub container_engine_binary: String,
    /// Optional privilege-elevation wrapper prefixed to every external
    /// invocation (e.g. `sudo`). `None` runs the binaries directly.
    #[serde(default)]
    pub privilege_wrapper: Option<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            lab_engine_binary: default_lab_engine(),
            container_engine_binary: default_container_engine(),
            privilege_wrapper: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }
}
