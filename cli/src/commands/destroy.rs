// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

use ae3gis_orchestrator_core::application::deployment_service;
use ae3gis_orchestrator_core::infrastructure::config::OrchestratorConfig;
use ae3gis_orchestrator_core::infrastructure::lab_driver::LabDriver;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct DestroyArgs {
    /// Id of the deployed topology to destroy.
    #[arg(long, value_name = "ID")]
    pub topology_id: String,

    /// Name the topology was deployed under (used to find the engine's
    /// working subdirectory).
    #[arg(long, value_name = "NAME")]
    pub topology_name: String,
}

pub async fn run(config: &OrchestratorConfig, args: DestroyArgs) -> Result<()> {
    let driver = LabDriver::new(
        config.lab_engine_binary.clone(),
        config.container_engine_binary.clone(),
        config.privilege_wrapper.clone(),
        config.workdir.clone(),
    );

    deployment_service::destroy(&driver, &args.topology_id, &args.topology_name)
        .await
        .context("destroying topology")?;

    println!("{}", "destroyed".green().bold());
    Ok(())
}
