// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

use std::path::PathBuf;

use ae3gis_orchestrator_core::application::deployment_service;
use ae3gis_orchestrator_core::domain::topology::Topology;
use ae3gis_orchestrator_core::infrastructure::config::OrchestratorConfig;
use ae3gis_orchestrator_core::infrastructure::lab_driver::LabDriver;
use ae3gis_orchestrator_core::infrastructure::seeder::Seeder;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct DeployArgs {
    /// Path to the authored topology YAML file.
    #[arg(value_name = "TOPOLOGY_FILE")]
    pub topology_file: PathBuf,

    /// Id to compile, write, and deploy under.
    #[arg(long, value_name = "ID")]
    pub topology_id: String,
}

pub async fn run(config: &OrchestratorConfig, args: DeployArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.topology_file)
        .with_context(|| format!("reading topology file {}", args.topology_file.display()))?;
    let topology: Topology = serde_yaml::from_str(&contents).context("parsing topology file")?;

    let driver = LabDriver::new(
        config.lab_engine_binary.clone(),
        config.container_engine_binary.clone(),
        config.privilege_wrapper.clone(),
        config.workdir.clone(),
    );
    let seeder = Seeder::new(&config.container_engine_binary, config.privilege_wrapper.as_deref(), &config.workdir);

    let outcome = deployment_service::deploy(&driver, &seeder, &config.workdir, &args.topology_id, &topology)
        .await
        .context("deploying topology")?;

    println!("{}", "deployed".green().bold());
    if !outcome.skips.is_empty() {
        println!("{}", format!("{} endpoint(s) skipped during compilation:", outcome.skips.len()).yellow());
        for skip in &outcome.skips {
            println!("  - {skip:?}");
        }
    }
    if !outcome.engine_stdout.trim().is_empty() {
        println!("{}", outcome.engine_stdout.trim());
    }

    Ok(())
}
