// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Shared subprocess invocation for every infrastructure component that
//! shells out to an external binary (lab engine, container engine). Wraps
//! `tokio::process::Command` with the configured privilege-elevation prefix
//! and captures stdout/stderr as UTF-8 for callers to pattern-match on.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn { program: String, #[source] source: std::io::Error },
    #[error("`{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("`{program}` exited with status {status}: {stderr}")]
    NonZeroExit { program: String, status: std::process::ExitStatus, stderr: String },
}

/// The outcome of running an external command to completion.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Builds the argv for an external invocation, applying the configured
/// privilege-elevation wrapper (if any) as a leading program + arg0.
pub fn build_command(wrapper: Option<&str>, program: &str, args: &[&str]) -> Command {
    match wrapper {
        Some(wrapper) => {
            let mut cmd = Command::new(wrapper);
            cmd.arg(program).args(args);
            cmd
        }
        None => {
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
    }
}

/// Runs `command` to completion within `timeout_duration`, capturing
/// stdout/stderr regardless of exit status. Does not itself interpret a
/// non-zero exit as an error — callers that need best-effort semantics
/// (inspect) or bespoke stderr pattern matching (the Lab Driver's retry
/// logic) read `CommandOutput` directly.
pub async fn run_capture(
    mut command: Command,
    program: &str,
    timeout_duration: Duration,
) -> Result<CommandOutput, ProcessError> {
    let output = timeout(timeout_duration, command.output())
        .await
        .map_err(|_| ProcessError::Timeout { program: program.to_string(), timeout: timeout_duration })?
        .map_err(|source| ProcessError::Spawn { program: program.to_string(), source })?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs `command` and turns a non-zero exit into `ProcessError::NonZeroExit`.
/// The common case for driver operations that have no bespoke recovery path.
pub async fn run_checked(
    command: Command,
    program: &str,
    timeout_duration: Duration,
) -> Result<CommandOutput, ProcessError> {
    let output = run_capture(command, program, timeout_duration).await?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(ProcessError::NonZeroExit {
            program: program.to_string(),
            status: output.status,
            stderr: output.stderr,
        })
    }
}
