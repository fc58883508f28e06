// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Ties the compiler, descriptor writer, persistence seeder, and lab driver
//! into the single end-to-end "deploy this topology" use case. The HTTP/
//! authoring layer is responsible for serializing concurrent calls against
//! the same topology id; this service does not lock anything itself.

use thiserror::Error;
use tracing::info;

use crate::domain::compiler::compile;
use crate::domain::descriptor::CompileSkip;
use crate::domain::topology::Topology;
use crate::infrastructure::lab_driver::{EngineError, LabDriver};
use crate::infrastructure::seeder::{PersistencePath, Seeder, SeederError};

use super::descriptor_writer::{self, DescriptorWriteError};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("{0}")]
    Write(#[from] DescriptorWriteError),
    #[error("{0}")]
    Seed(#[from] SeederError),
    #[error("{0}")]
    Engine(#[from] EngineError),
}

/// The outcome of a successful deploy: the engine's stdout and the skips
/// the compiler recorded along the way.
pub struct DeployOutcome {
    pub engine_stdout: String,
    pub skips: Vec<CompileSkip>,
}

/// Compiles `topology`, writes its descriptor, seeds every container's
/// persistence paths, then deploys it.
pub async fn deploy(
    driver: &LabDriver,
    seeder: &Seeder<'_>,
    workdir: &std::path::Path,
    topology_id: &str,
    topology: &Topology,
) -> Result<DeployOutcome, DeploymentError> {
    let output = compile(topology, topology_id);
    if !output.skips.is_empty() {
        info!(topology_id, skips = output.skips.len(), "compiled with unresolved endpoints");
    }

    descriptor_writer::write(workdir, topology_id, &output.descriptor).await?;

    for container in topology.containers() {
        let image = container.image.as_deref().unwrap_or_default();
        if image.is_empty() {
            continue;
        }
        for in_container_path in &container.persist_paths {
            let path = PersistencePath {
                topology_id,
                container_id: container.id.as_str(),
                in_container_path,
                image,
            };
            seeder.ensure_seeded(&path).await?;
        }
    }

    let engine_stdout = driver.deploy(topology_id).await?;
    Ok(DeployOutcome { engine_stdout, skips: output.skips })
}

/// Destroys the deployed topology and removes its descriptor/engine state.
pub async fn destroy(driver: &LabDriver, topology_id: &str, topology_name: &str) -> Result<(), EngineError> {
    driver.destroy(topology_id).await?;
    driver.cleanup(topology_id, topology_name).await
}
