// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration discovery and loading.
//!
//! Discovery order: `--config` flag, `AE3GIS_CONFIG_PATH` env var,
//! `./ae3gis-config.yaml`, `~/.ae3gis/config.yaml`, `/etc/ae3gis/config.yaml`.
//! Falls back to built-in defaults if none of those exist.

use std::path::{Path, PathBuf};

use ae3gis_orchestrator_core::infrastructure::config::OrchestratorConfig;
use anyhow::{Context, Result};

pub fn load(override_path: Option<PathBuf>) -> Result<OrchestratorConfig> {
    if let Some(path) = override_path {
        return load_from(&path);
    }

    for candidate in discovery_candidates() {
        if candidate.exists() {
            return load_from(&candidate);
        }
    }

    Ok(OrchestratorConfig::default())
}

fn discovery_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("./ae3gis-config.yaml")];
    if let Some(home) = dirs_home() {
        candidates.push(home.join(".ae3gis/config.yaml"));
    }
    candidates.push(PathBuf::from("/etc/ae3gis/config.yaml"));
    candidates
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn load_from(path: &Path) -> Result<OrchestratorConfig> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading config file {}", path.display()))?;
    OrchestratorConfig::from_yaml_str(&contents).with_context(|| format!("parsing config file {}", path.display()))
}
