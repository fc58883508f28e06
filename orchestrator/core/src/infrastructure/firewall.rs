// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Manages the `AE3GIS-FW` iptables chain inside a router/firewall
//! container: read the current rule set, or replace it wholesale with one
//! idempotent apply.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::process::{build_command, run_capture, ProcessError};
use std::time::Duration;

const FIREWALL_TIMEOUT: Duration = Duration::from_secs(15);
const CHAIN: &str = "AE3GIS-FW";

#[derive(Debug, Error)]
pub enum FirewallError {
    #[error("no working iptables binary found in container")]
    NoBinary,
    #[error("{0}")]
    Process(#[from] ProcessError),
    #[error("failed to list rules: {0}")]
    ListFailed(String),
    #[error("failed to apply rules: {0}")]
    ApplyFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Any,
    Tcp,
    Udp,
    Icmp,
}

impl Protocol {
    fn parse(raw: &str) -> Self {
        match raw {
            "tcp" => Protocol::Tcp,
            "udp" => Protocol::Udp,
            "icmp" => Protocol::Icmp,
            _ => Protocol::Any,
        }
    }

    fn as_flag(self) -> Option<&'static str> {
        match self {
            Protocol::Any => None,
            Protocol::Tcp => Some("tcp"),
            Protocol::Udp => Some("udp"),
            Protocol::Icmp => Some("icmp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Accept,
    Drop,
}

impl Action {
    fn parse(raw: &str) -> Self {
        match raw {
            "DROP" => Action::Drop,
            _ => Action::Accept,
        }
    }

    fn as_target(self) -> &'static str {
        match self {
            Action::Accept => "ACCEPT",
            Action::Drop => "DROP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub source: String,
    pub destination: String,
    pub protocol: Protocol,
    pub port: String,
    pub action: Action,
}

/// Binary used to run `iptables` invocations inside a container. The
/// controller probes once and reuses the result for the container's
/// lifetime.
pub struct FirewallController<'a> {
    container_engine_binary: &'a str,
    privilege_wrapper: Option<&'a str>,
    docker_name: String,
    iptables_binary: String,
}

impl<'a> FirewallController<'a> {
    /// Probes the container for a working iptables binary, preferring
    /// `iptables` and falling back to `iptables-nft`.
    pub async fn detect(container_engine_binary: &'a str, privilege_wrapper: Option<&'a str>, docker_name: &str) -> Result<FirewallController<'a>, FirewallError> {
        for candidate in ["iptables", "iptables-nft"] {
            let command = build_command(
                privilege_wrapper,
                container_engine_binary,
                &["exec", &docker_name, candidate, "-V"],
            );
            if let Ok(output) = run_capture(command, container_engine_binary, FIREWALL_TIMEOUT).await {
                if output.status.success() {
                    return Ok(FirewallController {
                        container_engine_binary,
                        privilege_wrapper,
                        docker_name: docker_name.to_string(),
                        iptables_binary: candidate.to_string(),
                    });
                }
            }
        }
        Err(FirewallError::NoBinary)
    }

    async fn exec(&self, args: &[&str]) -> Result<super::process::CommandOutput, ProcessError> {
        let mut full = vec!["exec", self.docker_name.as_str(), self.iptables_binary.as_str()];
        full.extend_from_slice(args);
        let command = build_command(self.privilege_wrapper, self.container_engine_binary, &full);
        run_capture(command, self.container_engine_binary, FIREWALL_TIMEOUT).await
    }

    /// Reads the current chain contents. An absent chain reads as an empty
    /// rule list rather than an error.
    pub async fn read(&self) -> Result<Vec<FirewallRule>, FirewallError> {
        let output = self.exec(&["-S", CHAIN]).await?;
        if !output.status.success() {
            let lower = output.stderr.to_lowercase();
            if lower.contains("no chain") || lower.contains("no target") || lower.contains("no match") {
                return Ok(Vec::new());
            }
            return Err(FirewallError::ListFailed(output.stderr));
        }
        Ok(output.stdout.lines().filter_map(parse_rule_line).collect())
    }

    /// Replaces the chain's contents with `rules`, creating and wiring the
    /// chain if it doesn't exist yet, then returns the freshly read rules.
    pub async fn apply(&self, rules: &[FirewallRule]) -> Result<Vec<FirewallRule>, FirewallError> {
        self.exec(&["-N", CHAIN]).await.ok();
        self.ensure_forward_jump().await?;

        let flush = self.exec(&["-F", CHAIN]).await?;
        if !flush.status.success() {
            return Err(FirewallError::ApplyFailed(flush.stderr));
        }

        for rule in rules {
            let args = rule_to_args(rule);
            let refs: Vec<&str> = args.iter().map(String::as_str).collect();
            let result = self.exec(&refs).await?;
            if !result.status.success() {
                return Err(FirewallError::ApplyFailed(result.stderr));
            }
        }

        self.read().await
    }

    async fn ensure_forward_jump(&self) -> Result<(), FirewallError> {
        let existing = self.exec(&["-S", "FORWARD"]).await?;
        let already_jumps = existing.stdout.lines().any(|line| line.contains(&format!("-j {CHAIN}")));
        if !already_jumps {
            self.exec(&["-I", "FORWARD", "1", "-j", CHAIN]).await?;
        }
        Ok(())
    }
}

/// Renders a rule into the `-A AE3GIS-FW ...` argument list `apply()` execs.
///
/// Inverse of [`parse_rule_line`]: feeding the result back through that
/// parser reproduces the same rule, modulo the `"any"`/`"-"` normalization
/// `apply()` already applies on read.
fn rule_to_args(rule: &FirewallRule) -> Vec<String> {
    let mut args = vec!["-A".to_string(), CHAIN.to_string()];
    if rule.source != "any" {
        args.push("-s".to_string());
        args.push(rule.source.clone());
    }
    if rule.destination != "any" {
        args.push("-d".to_string());
        args.push(rule.destination.clone());
    }
    if let Some(proto) = rule.protocol.as_flag() {
        args.push("-p".to_string());
        args.push(proto.to_string());
        if rule.port != "-" {
            args.push("--dport".to_string());
            args.push(rule.port.clone());
        }
    }
    args.push("-j".to_string());
    args.push(rule.action.as_target().to_string());
    args
}

/// Parses one `-A AE3GIS-FW ...` line from `iptables -S` output.
fn parse_rule_line(line: &str) -> Option<FirewallRule> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 || tokens[0] != "-A" || tokens[1] != CHAIN {
        return None;
    }

    let mut source = "any".to_string();
    let mut destination = "any".to_string();
    let mut protocol = Protocol::Any;
    let mut port = "-".to_string();
    let mut action = Action::Accept;

    let mut i = 2;
    while i < tokens.len() {
        match tokens[i] {
            "-s" if i + 1 < tokens.len() => {
                source = tokens[i + 1].to_string();
                i += 2;
            }
            "-d" if i + 1 < tokens.len() => {
                destination = tokens[i + 1].to_string();
                i += 2;
            }
            "-p" if i + 1 < tokens.len() => {
                protocol = Protocol::parse(tokens[i + 1]);
                i += 2;
            }
            "--dport" if i + 1 < tokens.len() => {
                port = tokens[i + 1].to_string();
                i += 2;
            }
            "-j" if i + 1 < tokens.len() => {
                action = Action::parse(tokens[i + 1]);
                i += 2;
            }
            _ => i += 1,
        }
    }

    if matches!(protocol, Protocol::Any | Protocol::Icmp) {
        port = "-".to_string();
    }

    Some(FirewallRule { source, destination, protocol, port, action })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_tcp_rule() {
        let rule = parse_rule_line("-A AE3GIS-FW -s 10.0.0.10 -d 10.0.0.20 -p tcp --dport 443 -j DROP").unwrap();
        assert_eq!(rule.source, "10.0.0.10");
        assert_eq!(rule.destination, "10.0.0.20");
        assert_eq!(rule.protocol, Protocol::Tcp);
        assert_eq!(rule.port, "443");
        assert_eq!(rule.action, Action::Drop);
    }

    #[test]
    fn icmp_rules_have_no_port_even_if_one_appears() {
        let rule = parse_rule_line("-A AE3GIS-FW -p icmp -j ACCEPT").unwrap();
        assert_eq!(rule.protocol, Protocol::Icmp);
        assert_eq!(rule.port, "-");
    }

    #[test]
    fn unknown_protocol_and_action_fall_back_to_defaults() {
        let rule = parse_rule_line("-A AE3GIS-FW -s 10.0.0.0/24 -j REJECT").unwrap();
        assert_eq!(rule.protocol, Protocol::Any);
        assert_eq!(rule.action, Action::Accept);
        assert_eq!(rule.port, "-");
    }

    #[test]
    fn render_then_parse_is_idempotent_for_a_drop_rule() {
        let rule = FirewallRule {
            source: "any".to_string(),
            destination: "10.0.0.5".to_string(),
            protocol: Protocol::Tcp,
            port: "22".to_string(),
            action: Action::Drop,
        };
        let line = rule_to_args(&rule).join(" ");
        let reparsed = parse_rule_line(&line).unwrap();
        assert_eq!(reparsed, rule);
    }

    #[test]
    fn non_chain_lines_are_ignored() {
        assert!(parse_rule_line("-P FORWARD ACCEPT").is_none());
    }
}
