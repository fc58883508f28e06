// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! The interactive exec multiplexer: allocates a pseudo-terminal, runs
//! `<container-engine> exec -it <docker-name> /bin/sh` against its slave
//! end, and relays bytes full-duplex with the peer stream until either
//! side closes.

use std::os::fd::{AsRawFd, OwnedFd};
use std::process::Stdio;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{openpty, Winsize};
use serde::Deserialize;
use thiserror::Error;
use tokio::io::unix::AsyncFd;
use tokio::process::Child;
use tracing::{debug, warn};

use crate::infrastructure::process::build_command;

const READ_CHUNK: usize = 4096;
const CHILD_TERMINATE_GRACE: Duration = Duration::from_secs(2);
const DEFAULT_ROWS: u16 = 24;
const DEFAULT_COLS: u16 = 80;

#[derive(Debug, Error)]
pub enum PtyError {
    #[error("failed to allocate pseudo-terminal: {0}")]
    Allocate(#[from] nix::Error),
    #[error("failed to spawn exec session: {0}")]
    Spawn(#[from] std::io::Error),
}

nix::ioctl_write_ptr_bad!(tiocswinsz, nix::libc::TIOCSWINSZ, Winsize);

fn docker_name(topology_name: &str, container_id: &str) -> String {
    format!("clab-{topology_name}-{container_id}")
}

/// A live PTY-backed exec session: the master end and the child holding
/// the slave end open as its stdio.
pub struct PtySession {
    master: AsyncFd<OwnedFd>,
    child: Child,
}

impl PtySession {
    /// Allocates a PTY at the default 24x80 size and execs `/bin/sh` inside
    /// the named container with the slave end as its stdio.
    pub fn spawn(container_engine_binary: &str, privilege_wrapper: Option<&str>, docker_name: &str) -> Result<Self, PtyError> {
        let winsize = Winsize { ws_row: DEFAULT_ROWS, ws_col: DEFAULT_COLS, ws_xpixel: 0, ws_ypixel: 0 };
        let pty = openpty(Some(&winsize), None)?;

        let flags = fcntl(&pty.master, FcntlArg::F_GETFL)?;
        fcntl(&pty.master, FcntlArg::F_SETFL(OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK))?;

        let mut command = build_command(privilege_wrapper, container_engine_binary, &["exec", "-it", docker_name, "/bin/sh"]);
        command
            .stdin(Stdio::from(pty.slave.try_clone()?))
            .stdout(Stdio::from(pty.slave.try_clone()?))
            .stderr(Stdio::from(pty.slave));

        let child = command.spawn()?;

        Ok(Self { master: AsyncFd::new(pty.master)?, child })
    }

    fn resize(&self, cols: u16, rows: u16) {
        let winsize = Winsize { ws_row: rows.max(1), ws_col: cols.max(1), ws_xpixel: 0, ws_ypixel: 0 };
        unsafe {
            let _ = tiocswinsz(self.master.get_ref().as_raw_fd(), &winsize);
        }
    }

    async fn read_chunk(&self) -> std::io::Result<Vec<u8>> {
        loop {
            let mut guard = self.master.readable().await?;
            let mut buf = [0u8; READ_CHUNK];
            match guard.try_io(|inner| {
                let fd = inner.get_ref().as_raw_fd();
                let n = unsafe { nix::libc::read(fd, buf.as_mut_ptr() as *mut nix::libc::c_void, buf.len()) };
                if n < 0 {
                    Err(std::io::Error::last_os_error())
                } else {
                    Ok(n as usize)
                }
            }) {
                Ok(Ok(n)) => return Ok(buf[..n].to_vec()),
                Ok(Err(err)) => return Err(err),
                Err(_would_block) => continue,
            }
        }
    }

    fn write_bytes(&self, data: &[u8]) -> std::io::Result<()> {
        let fd = self.master.get_ref().as_raw_fd();
        let mut written = 0;
        while written < data.len() {
            let n = unsafe { nix::libc::write(fd, data[written..].as_ptr() as *const nix::libc::c_void, data.len() - written) };
            if n < 0 {
                return Err(std::io::Error::last_os_error());
            }
            written += n as usize;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ResizeFrame {
    #[serde(rename = "type")]
    kind: String,
    cols: u16,
    rows: u16,
}

fn parse_resize(text: &str) -> Option<(u16, u16)> {
    let frame: ResizeFrame = serde_json::from_str(text).ok()?;
    if frame.kind == "resize" {
        Some((frame.cols.max(1), frame.rows.max(1)))
    } else {
        None
    }
}

/// Runs the full-duplex relay between `socket` and the session's PTY until
/// either side closes, then tears the session down.
pub async fn relay(mut socket: WebSocket, mut session: PtySession) {
    loop {
        tokio::select! {
            read = session.read_chunk() => {
                match read {
                    Ok(chunk) if !chunk.is_empty() => {
                        let text = String::from_utf8_lossy(&chunk).into_owned();
                        if socket.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some((cols, rows)) = parse_resize(&text) {
                            session.resize(cols, rows);
                        } else if let Err(err) = session.write_bytes(text.as_bytes()) {
                            warn!(error = %err, "failed writing to pty master");
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        if let Err(err) = session.write_bytes(&data) {
                            warn!(error = %err, "failed writing to pty master");
                            break;
                        }
                    }
                    Some(Ok(_)) => continue,
                    _ => break,
                }
            }
        }
    }

    teardown(&mut session).await;
    let _ = socket.send(Message::Text("\r\n[session ended]\r\n".to_string().into())).await;
}

async fn teardown(session: &mut PtySession) {
    if let Ok(None) = session.child.try_wait() {
        if let Some(pid) = session.child.id() {
            unsafe {
                nix::libc::kill(pid as i32, nix::libc::SIGTERM);
            }
        }
        let _ = tokio::time::timeout(CHILD_TERMINATE_GRACE, session.child.wait()).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckResult {
    Ok,
    ContainerNotFound,
    DockerPermissionDenied,
    DockerInspectFailed,
}

/// Synchronous diagnostic the UI calls before opening a stream, so exec
/// failures can be attributed without paying for a PTY allocation.
pub async fn precheck(container_engine_binary: &str, privilege_wrapper: Option<&str>, topology_name: &str, container_id: &str) -> PrecheckResult {
    let name = docker_name(topology_name, container_id);
    let command = build_command(privilege_wrapper, container_engine_binary, &["inspect", &name]);

    match crate::infrastructure::process::run_capture(command, container_engine_binary, Duration::from_secs(10)).await {
        Ok(output) if output.status.success() => PrecheckResult::Ok,
        Ok(output) => {
            let stderr = output.stderr.to_lowercase();
            if stderr.contains("no such object") || stderr.contains("no such container") {
                PrecheckResult::ContainerNotFound
            } else if stderr.contains("permission denied") || stderr.contains("password is required") {
                PrecheckResult::DockerPermissionDenied
            } else {
                debug!(container_id, stderr = %output.stderr, "inspect precheck failed");
                PrecheckResult::DockerInspectFailed
            }
        }
        Err(err) => {
            debug!(container_id, error = %err, "inspect precheck could not run");
            PrecheckResult::DockerInspectFailed
        }
    }
}
