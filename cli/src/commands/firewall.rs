// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

use std::path::PathBuf;

use ae3gis_orchestrator_core::infrastructure::config::OrchestratorConfig;
use ae3gis_orchestrator_core::infrastructure::firewall::{FirewallController, FirewallRule};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Subcommand)]
pub enum FirewallCommand {
    /// Read the current AE3GIS-FW chain inside a container.
    Show(FirewallShowArgs),
    /// Replace the AE3GIS-FW chain with the rules in a file.
    Apply(FirewallApplyArgs),
}

#[derive(Args)]
pub struct FirewallShowArgs {
    /// The running container's engine name (e.g. `clab-lab-1-fw-1`).
    #[arg(value_name = "CONTAINER_NAME")]
    pub container_name: String,
}

#[derive(Args)]
pub struct FirewallApplyArgs {
    /// The running container's engine name (e.g. `clab-lab-1-fw-1`).
    #[arg(value_name = "CONTAINER_NAME")]
    pub container_name: String,

    /// Path to a YAML or JSON file holding the rule list to apply.
    #[arg(value_name = "RULES_FILE")]
    pub rules_file: PathBuf,
}

pub async fn run(config: &OrchestratorConfig, command: FirewallCommand) -> Result<()> {
    match command {
        FirewallCommand::Show(args) => show(config, args).await,
        FirewallCommand::Apply(args) => apply(config, args).await,
    }
}

async fn controller<'a>(config: &'a OrchestratorConfig, container_name: &str) -> Result<FirewallController<'a>> {
    FirewallController::detect(&config.container_engine_binary, config.privilege_wrapper.as_deref(), container_name)
        .await
        .context("probing for a working iptables binary")
}

async fn show(config: &OrchestratorConfig, args: FirewallShowArgs) -> Result<()> {
    let controller = controller(config, &args.container_name).await?;
    let rules = controller.read().await.context("reading firewall rules")?;
    print_rules(&rules);
    Ok(())
}

async fn apply(config: &OrchestratorConfig, args: FirewallApplyArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.rules_file)
        .with_context(|| format!("reading rules file {}", args.rules_file.display()))?;
    let rules: Vec<FirewallRule> = serde_yaml::from_str(&contents).context("parsing rules file")?;

    let controller = controller(config, &args.container_name).await?;
    let applied = controller.apply(&rules).await.context("applying firewall rules")?;

    println!("{}", "applied".green().bold());
    print_rules(&applied);
    Ok(())
}

fn print_rules(rules: &[FirewallRule]) {
    if rules.is_empty() {
        println!("{}", "(no rules)".dimmed());
        return;
    }
    for rule in rules {
        println!("{:?}  {} -> {}  port {}  {:?}", rule.protocol, rule.source, rule.destination, rule.port, rule.action);
    }
}
