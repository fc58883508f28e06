// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

use std::path::PathBuf;

use ae3gis_orchestrator_core::application::descriptor_writer;
use ae3gis_orchestrator_core::domain::compiler::compile as compile_topology;
use ae3gis_orchestrator_core::domain::topology::Topology;
use ae3gis_orchestrator_core::infrastructure::config::OrchestratorConfig;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct CompileArgs {
    /// Path to the authored topology YAML file.
    #[arg(value_name = "TOPOLOGY_FILE")]
    pub topology_file: PathBuf,

    /// Id to write the compiled descriptor under.
    #[arg(long, value_name = "ID")]
    pub topology_id: String,
}

pub async fn run(config: &OrchestratorConfig, args: CompileArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.topology_file)
        .with_context(|| format!("reading topology file {}", args.topology_file.display()))?;
    let topology: Topology = serde_yaml::from_str(&contents).context("parsing topology file")?;

    let output = compile_topology(&topology, &args.topology_id);
    let path = descriptor_writer::write(&config.workdir, &args.topology_id, &output.descriptor)
        .await
        .context("writing compiled descriptor")?;

    println!("{} {}", "wrote descriptor:".bold(), path.display());
    if output.skips.is_empty() {
        println!("{}", "no endpoints skipped".green());
    } else {
        println!("{}", format!("{} endpoint(s) skipped:", output.skips.len()).yellow());
        for skip in &output.skips {
            println!("  - {skip:?}");
        }
    }

    Ok(())
}
