// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Long-lived status stream: every 5 seconds, push the topology's persisted
//! lifecycle status alongside a fresh container inspection.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;
use tracing::debug;

use crate::domain::repository::{AuthOutcome, TokenAuthorizer, TopologyRepository};
use crate::infrastructure::lab_driver::LabDriver;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const CLOSE_FORBIDDEN: u16 = 4003;
const CLOSE_NOT_FOUND: u16 = 4004;

pub struct StatusStreamState {
    pub repository: Arc<dyn TopologyRepository>,
    pub authorizer: Arc<dyn TokenAuthorizer>,
    pub driver: Arc<LabDriver>,
}

#[derive(Debug, Serialize)]
struct StatusMessage {
    status: String,
    containers: Vec<ContainerStatus>,
}

#[derive(Debug, Serialize)]
struct ContainerStatus {
    name: String,
    state: Option<String>,
    ipv4_address: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct StatusStreamQuery {
    pub token: String,
}

pub async fn status_stream(
    State(state): State<Arc<StatusStreamState>>,
    Path(topology_id): Path<String>,
    axum::extract::Query(query): axum::extract::Query<StatusStreamQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle(socket, state, topology_id, query.token))
}

async fn handle(mut socket: WebSocket, state: Arc<StatusStreamState>, topology_id: String, token: String) {
    let node_id = crate::domain::topology::NodeId::new(topology_id.clone());

    match state.authorizer.authorize(&token, &node_id).await {
        Ok(AuthOutcome::Instructor) | Ok(AuthOutcome::Student { .. }) => {}
        Err(_) => {
            close_with(&mut socket, CLOSE_FORBIDDEN, "forbidden").await;
            return;
        }
    }

    let topology = match state.repository.load(&node_id).await {
        Ok(topology) => topology,
        Err(_) => {
            close_with(&mut socket, CLOSE_NOT_FOUND, "not found").await;
            return;
        }
    };

    let topology_name = topology.effective_name().to_string();
    let mut interval = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let status = match state.repository.status(&node_id).await {
                    Ok(status) => status,
                    Err(_) => {
                        close_with(&mut socket, CLOSE_NOT_FOUND, "not found").await;
                        return;
                    }
                };
                let containers = state.driver.inspect(&topology_name).await;
                let message = StatusMessage {
                    status: status.as_str().to_string(),
                    containers: containers.into_iter().map(|c| ContainerStatus {
                        name: c.name,
                        state: c.state,
                        ipv4_address: c.ipv4_address,
                    }).collect(),
                };
                let payload = match serde_json::to_string(&message) {
                    Ok(payload) => payload,
                    Err(_) => continue,
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    debug!(topology_id, "status stream peer gone");
                    return;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(_)) => continue,
                    _ => return,
                }
            }
        }
    }
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame { code, reason: reason.to_string().into() })))
        .await;
}
