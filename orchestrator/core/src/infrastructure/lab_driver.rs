// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Wraps the external lab-engine and container-engine binaries: deploy,
//! destroy, inspect, and cleanup for a single topology's descriptor file.
//! Subprocess shape grounded on the Python reference implementation's
//! `asyncio.create_subprocess_exec` driver; the typed error and timeout
//! wrapper around each invocation follows the compose-runner pattern
//! elsewhere in this corpus.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::mgmt_allocator::{self, ManagementNetwork};
use super::process::{build_command, run_capture, run_checked, ProcessError};

const DEPLOY_TIMEOUT: Duration = Duration::from_secs(300);
const DESTROY_TIMEOUT: Duration = Duration::from_secs(120);
const INSPECT_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_OVERLAP_ATTEMPTS: u32 = 4;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("descriptor file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("{0}")]
    Process(#[from] ProcessError),
    #[error("lab engine failed after exhausting retries: {stderr}")]
    RetriesExhausted { stderr: String },
    #[error("lab engine deploy failed: {stderr}")]
    DeployFailed { stderr: String },
}

pub struct LabDriver {
    lab_engine_binary: String,
    container_engine_binary: String,
    privilege_wrapper: Option<String>,
    workdir: PathBuf,
}

impl LabDriver {
    pub fn new(
        lab_engine_binary: impl Into<String>,
        container_engine_binary: impl Into<String>,
        privilege_wrapper: Option<String>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            lab_engine_binary: lab_engine_binary.into(),
            container_engine_binary: container_engine_binary.into(),
            privilege_wrapper,
            workdir: workdir.into(),
        }
    }

    fn descriptor_path(&self, topology_id: &str) -> PathBuf {
        self.workdir.join(format!("{topology_id}.clab.yml"))
    }

    /// Deploys the descriptor already written for `topology_id`, retrying
    /// with a freshly allocated management subnet on overlap, and clearing
    /// a stale docker network object (without spending a retry attempt) on
    /// the stale-bridge failure pattern.
    pub async fn deploy(&self, topology_id: &str) -> Result<String, EngineError> {
        let descriptor_path = self.descriptor_path(topology_id);
        if !descriptor_path.exists() {
            return Err(EngineError::FileNotFound(descriptor_path));
        }

        let mut attempt = 0u32;
        loop {
            let network = mgmt_allocator::allocate(topology_id, attempt);
            match self.try_deploy(&descriptor_path, &network).await {
                Ok(stdout) => return Ok(stdout),
                Err(stderr) if is_stale_bridge(&stderr) => {
                    warn!(topology_id, network = %network.name, "stale bridge reference, removing network object and retrying");
                    self.remove_network(&network.name).await.ok();
                }
                Err(stderr) if is_overlap(&stderr) && attempt + 1 < MAX_OVERLAP_ATTEMPTS => {
                    info!(topology_id, attempt, "management subnet overlap, retrying with a new subnet");
                    attempt += 1;
                }
                Err(stderr) if is_overlap(&stderr) => {
                    return Err(EngineError::RetriesExhausted { stderr });
                }
                Err(stderr) => return Err(EngineError::DeployFailed { stderr }),
            }
        }
    }

    async fn try_deploy(&self, descriptor_path: &Path, network: &ManagementNetwork) -> Result<String, String> {
        let path_str = descriptor_path.to_string_lossy().into_owned();
        let command = build_command(
            self.privilege_wrapper.as_deref(),
            &self.lab_engine_binary,
            &[
                "deploy",
                "-t",
                &path_str,
                "--network",
                &network.name,
                "--ipv4-subnet",
                &network.ipv4_subnet,
                "--ipv6-subnet",
                &network.ipv6_subnet,
                "--reconfigure",
            ],
        );

        match run_checked(command, &self.lab_engine_binary, DEPLOY_TIMEOUT).await {
            Ok(output) => Ok(output.stdout),
            Err(ProcessError::NonZeroExit { stderr, .. }) => Err(stderr),
            Err(other) => Err(other.to_string()),
        }
    }

    async fn remove_network(&self, name: &str) -> Result<(), ProcessError> {
        let command = build_command(self.privilege_wrapper.as_deref(), &self.container_engine_binary, &["network", "rm", name]);
        run_capture(command, &self.container_engine_binary, INSPECT_TIMEOUT).await.map(|_| ())
    }

    pub async fn destroy(&self, topology_id: &str) -> Result<(), EngineError> {
        let descriptor_path = self.descriptor_path(topology_id);
        if !descriptor_path.exists() {
            return Err(EngineError::FileNotFound(descriptor_path));
        }
        let path_str = descriptor_path.to_string_lossy().into_owned();
        let command = build_command(self.privilege_wrapper.as_deref(), &self.lab_engine_binary, &["destroy", "-t", &path_str]);
        run_checked(command, &self.lab_engine_binary, DESTROY_TIMEOUT).await?;
        Ok(())
    }

    /// Best-effort inspection: any failure (engine missing, non-zero exit,
    /// unparseable JSON) yields an empty list rather than an error.
    pub async fn inspect(&self, topology_name: &str) -> Vec<InspectedContainer> {
        let command = build_command(self.privilege_wrapper.as_deref(), &self.lab_engine_binary, &["inspect", "--name", topology_name, "--format", "json"]);

        let output = match run_capture(command, &self.lab_engine_binary, INSPECT_TIMEOUT).await {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!(topology_name, stderr = %output.stderr, "inspect exited non-zero");
                return Vec::new();
            }
            Err(err) => {
                debug!(topology_name, error = %err, "inspect failed to run");
                return Vec::new();
            }
        };

        match serde_json::from_str::<InspectResult>(&output.stdout) {
            Ok(result) => result.containers,
            Err(err) => {
                debug!(topology_name, error = %err, "inspect produced unparseable JSON");
                Vec::new()
            }
        }
    }

    /// Removes the descriptor file and the engine's working subdirectory,
    /// ignoring "already missing" errors.
    pub async fn cleanup(&self, topology_id: &str, topology_name: &str) -> Result<(), EngineError> {
        let descriptor_path = self.descriptor_path(topology_id);
        match tokio::fs::remove_file(&descriptor_path).await {
            Ok(()) | Err(_) => {}
        }
        let lab_dir = self.workdir.join(format!("clab-{topology_name}"));
        let _ = tokio::fs::remove_dir_all(&lab_dir).await;
        Ok(())
    }
}

fn is_overlap(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("overlap") && lower.contains("subnet")
}

fn is_stale_bridge(stderr: &str) -> bool {
    stderr.contains("Failed to lookup link \"br-") && stderr.contains("Link not found")
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectedContainer {
    pub name: String,
    pub state: Option<String>,
    pub ipv4_address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct InspectResult {
    #[serde(default)]
    containers: Vec<InspectedContainer>,
}
