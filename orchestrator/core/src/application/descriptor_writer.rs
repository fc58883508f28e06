// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Writes a compiled [`LabDescriptor`] to the workdir the Lab Driver reads
//! from. The write is atomic (temp file in the same directory, then
//! rename) so a concurrent status read or deploy never observes a
//! half-written descriptor.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::domain::descriptor::LabDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum DescriptorWriteError {
    #[error("failed to serialize descriptor to YAML: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write descriptor file: {0}")]
    Io(#[from] std::io::Error),
}

/// The descriptor file path the Lab Driver invokes the engine against for
/// topology `topology_id`, rooted under `workdir`.
pub fn descriptor_path(workdir: &Path, topology_id: &str) -> PathBuf {
    workdir.join(format!("{topology_id}.clab.yml"))
}

/// Serializes `descriptor` and atomically publishes it at
/// `descriptor_path(workdir, topology_id)`.
pub async fn write(
    workdir: &Path,
    topology_id: &str,
    descriptor: &LabDescriptor,
) -> Result<PathBuf, DescriptorWriteError> {
    fs::create_dir_all(workdir).await?;

    let yaml = descriptor.to_yaml()?;
    let final_path = descriptor_path(workdir, topology_id);
    let tmp_path = workdir.join(format!(".{topology_id}-{}.tmp", Uuid::new_v4()));

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(yaml.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, &final_path).await?;
    debug!(path = %final_path.display(), "wrote lab descriptor");
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::{LabDescriptor, TopologyBlock};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn write_is_atomic_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = LabDescriptor {
            name: "lab".to_string(),
            topology: TopologyBlock { nodes: BTreeMap::new(), links: Vec::new() },
        };

        let path = write(dir.path(), "topo-1", &descriptor).await.unwrap();
        let contents = fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("name: lab"));

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert!(!entries.iter().any(|name| name.ends_with(".tmp")));
    }
}
