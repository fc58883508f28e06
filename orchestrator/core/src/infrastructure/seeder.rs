// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Seeds a container's persistence paths from its image the first time a
//! topology is deployed, so bind-mounted volumes start out populated
//! instead of empty.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use super::process::{build_command, run_capture, ProcessError};

const SEED_TIMEOUT: Duration = Duration::from_secs(60);
const NOT_FOUND_EXIT_CODE: i32 = 42;

#[derive(Debug, Error)]
pub enum SeederError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Process(#[from] ProcessError),
}

/// One persistence path declared on a container: an in-container path that
/// should be bind-mounted from a host directory.
pub struct PersistencePath<'a> {
    pub topology_id: &'a str,
    pub container_id: &'a str,
    pub in_container_path: &'a str,
    pub image: &'a str,
}

pub struct Seeder<'a> {
    container_engine_binary: &'a str,
    privilege_wrapper: Option<&'a str>,
    metadata_root: PathBuf,
}

impl<'a> Seeder<'a> {
    pub fn new(container_engine_binary: &'a str, privilege_wrapper: Option<&'a str>, metadata_root: impl Into<PathBuf>) -> Self {
        Self { container_engine_binary, privilege_wrapper, metadata_root: metadata_root.into() }
    }

    /// The host directory a persistence path maps to: stable for the same
    /// `(topology_id, container_id, in_container_path)` triple.
    pub fn host_dir(&self, path: &PersistencePath<'_>) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(path.topology_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(path.container_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(path.in_container_path.as_bytes());
        let digest = hasher.finalize();
        let hex = hex_encode(&digest[..16]);
        self.metadata_root.join("volumes").join(hex)
    }

    fn sentinel_path(&self, host_dir: &Path) -> PathBuf {
        host_dir.join(".ae3gis-seeded")
    }

    /// Ensures the host directory for `path` exists and, if not already
    /// seeded, populates it from the container's image.
    pub async fn ensure_seeded(&self, path: &PersistencePath<'_>) -> Result<(), SeederError> {
        let host_dir = self.host_dir(path);
        tokio::fs::create_dir_all(&host_dir).await?;

        let sentinel = self.sentinel_path(&host_dir);
        if tokio::fs::try_exists(&sentinel).await? {
            return Ok(());
        }

        self.seed_from_image(path, &host_dir).await?;
        tokio::fs::write(&sentinel, b"").await?;
        Ok(())
    }

    async fn seed_from_image(&self, path: &PersistencePath<'_>, host_dir: &Path) -> Result<(), SeederError> {
        let host_mount = format!("{}:/ae3gis-seed", host_dir.display());
        let script = format!(
            "if [ -d '{src}' ]; then cp -a '{src}/.' /ae3gis-seed/; \
             elif [ -f '{src}' ]; then cp -a '{src}' /ae3gis-seed/; \
             else exit {not_found}; fi",
            src = path.in_container_path,
            not_found = NOT_FOUND_EXIT_CODE,
        );

        let command = build_command(
            self.privilege_wrapper,
            self.container_engine_binary,
            &["run", "--rm", "--entrypoint", "sh", "-v", &host_mount, path.image, "-lc", &script],
        );

        let output = run_capture(command, self.container_engine_binary, SEED_TIMEOUT).await?;

        if output.status.success() {
            info!(container_id = path.container_id, in_container_path = path.in_container_path, "seeded persistence path");
            return Ok(());
        }

        if output.status.code() == Some(NOT_FOUND_EXIT_CODE) {
            warn!(container_id = path.container_id, in_container_path = path.in_container_path, "path absent in image, leaving volume empty");
            return Ok(());
        }

        Err(SeederError::Process(ProcessError::NonZeroExit {
            program: self.container_engine_binary.to_string(),
            status: output.status,
            stderr: output.stderr,
        }))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_dir_is_stable_for_the_same_triple() {
        let seeder = Seeder::new("docker", None, "/var/lib/ae3gis/meta");
        let path = PersistencePath { topology_id: "t1", container_id: "c1", in_container_path: "/data", image: "alpine" };
        assert_eq!(seeder.host_dir(&path), seeder.host_dir(&path));
    }

    #[test]
    fn host_dir_differs_for_different_paths() {
        let seeder = Seeder::new("docker", None, "/var/lib/ae3gis/meta");
        let a = PersistencePath { topology_id: "t1", container_id: "c1", in_container_path: "/data", image: "alpine" };
        let b = PersistencePath { topology_id: "t1", container_id: "c1", in_container_path: "/other", image: "alpine" };
        assert_ne!(seeder.host_dir(&a), seeder.host_dir(&b));
    }

    #[tokio::test]
    async fn ensure_seeded_skips_when_sentinel_already_present() {
        let tmp = tempfile::tempdir().unwrap();
        let seeder = Seeder::new("docker", None, tmp.path());
        let path = PersistencePath { topology_id: "t1", container_id: "c1", in_container_path: "/data", image: "alpine" };
        let host_dir = seeder.host_dir(&path);
        tokio::fs::create_dir_all(&host_dir).await.unwrap();
        tokio::fs::write(seeder.sentinel_path(&host_dir), b"").await.unwrap();

        // With the sentinel present, this must return without ever invoking
        // the container engine (which would fail — "docker" may not exist
        // in the test environment).
        seeder.ensure_seeded(&path).await.unwrap();
    }
}
