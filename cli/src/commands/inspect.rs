// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

use ae3gis_orchestrator_core::infrastructure::config::OrchestratorConfig;
use ae3gis_orchestrator_core::infrastructure::lab_driver::LabDriver;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct InspectArgs {
    /// Name the topology was deployed under.
    #[arg(value_name = "TOPOLOGY_NAME")]
    pub topology_name: String,
}

pub async fn run(config: &OrchestratorConfig, args: InspectArgs) -> Result<()> {
    let driver = LabDriver::new(
        config.lab_engine_binary.clone(),
        config.container_engine_binary.clone(),
        config.privilege_wrapper.clone(),
        config.workdir.clone(),
    );

    let containers = driver.inspect(&args.topology_name).await;
    if containers.is_empty() {
        println!("{}", "no containers reported (engine missing, topology not running, or inspection failed)".yellow());
        return Ok(());
    }

    for container in containers {
        println!(
            "{}  {}  {}",
            container.name.bold(),
            container.state.as_deref().unwrap_or("unknown"),
            container.ipv4_address.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
