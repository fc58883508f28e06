// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! # ae3gisctl
//!
//! Operator CLI for the AE3GIS network-lab orchestrator. Drives the
//! topology compiler and deployment runtime directly against a local
//! container-lab/Docker install — it is not the HTTP routing surface a
//! classroom server exposes, it's the ambient "you can drive this from a
//! terminal" tool every component in this corpus ships alongside its
//! library.
//!
//! Commands: `compile`, `deploy`, `destroy`, `inspect`, `firewall show|apply`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{CompileArgs, DeployArgs, DestroyArgs, FirewallCommand, InspectArgs};

#[derive(Parser)]
#[command(name = "ae3gisctl")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the orchestrator config file (overrides discovery).
    #[arg(short, long, global = true, env = "AE3GIS_CONFIG_PATH", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "AE3GIS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a topology file into a lab descriptor and write it to the workdir.
    Compile(CompileArgs),
    /// Compile, seed persistence paths, and deploy a topology.
    Deploy(DeployArgs),
    /// Destroy a deployed topology and clean up its working state.
    Destroy(DestroyArgs),
    /// Inspect the running containers of a deployed topology.
    Inspect(InspectArgs),
    /// Show or apply the firewall chain inside a router/firewall container.
    Firewall {
        #[command(subcommand)]
        command: FirewallCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = commands::config::load(cli.config).context("failed to load orchestrator configuration")?;

    match cli.command {
        Commands::Compile(args) => commands::compile::run(&config, args).await,
        Commands::Deploy(args) => commands::deploy::run(&config, args).await,
        Commands::Destroy(args) => commands::destroy::run(&config, args).await,
        Commands::Inspect(args) => commands::inspect::run(&config, args).await,
        Commands::Firewall { command } => commands::firewall::run(&config, command).await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("failed to build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
