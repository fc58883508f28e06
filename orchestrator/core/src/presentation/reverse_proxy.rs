// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Forwards HTTP requests into a deployed container's web server. Request
//! and response bodies are both streamed through unbuffered — neither side
//! is read fully into memory, so a large upload or download never costs
//! more than one chunk's worth of heap. The upstream connection's lifetime
//! is coupled to the client's: `reqwest`'s streamed body is only released
//! once the downstream response is fully read or the client disconnects,
//! so nothing here holds it open longer than the caller does.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Request, Response, StatusCode};
use thiserror::Error;

use crate::domain::error::OrchestratorError;

const STRIPPED_REQUEST_HEADERS: &[&str] = &["host", "content-length"];
const STRIPPED_RESPONSE_HEADERS: &[&str] = &["transfer-encoding"];
const AUTH_QUERY_PARAM: &str = "token";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("topology is not deployed")]
    NotDeployed,
    #[error("container is not running")]
    NotRunning,
    #[error("container exposed no address: {0}")]
    NoAddress(String),
    #[error("failed to reach upstream: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Running state and addresses for one container, as read from a single
/// `inspect --format` invocation.
#[derive(Debug, Clone)]
pub struct ContainerNetworkState {
    pub running: bool,
    pub addresses: Vec<String>,
}

/// Parses `"true"/"false" | ip1 | ip2 | ..."` as produced by the
/// container-engine format string this component asks for.
pub fn parse_inspect_format(raw: &str) -> ContainerNetworkState {
    let mut parts = raw.trim().split('|');
    let running = parts.next().unwrap_or("false").trim() == "true";
    let addresses = parts.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();
    ContainerNetworkState { running, addresses }
}

/// Builds the upstream URL for a request against `ip` on port 80, copying
/// every query parameter from `original_query` except the auth token.
pub fn upstream_url(ip: &str, path: &str, original_query: &str) -> String {
    let mut url = format!("http://{ip}:80/{}", path.trim_start_matches('/'));
    let kept: Vec<&str> = original_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            key != AUTH_QUERY_PARAM
        })
        .collect();
    if !kept.is_empty() {
        url.push('?');
        url.push_str(&kept.join("&"));
    }
    url
}

/// Requires the container be running with at least one address, returning
/// the first one.
pub fn first_address(state: &ContainerNetworkState) -> Result<&str, ProxyError> {
    if !state.running {
        return Err(ProxyError::NotRunning);
    }
    state
        .addresses
        .iter()
        .find(|addr| !addr.is_empty())
        .map(String::as_str)
        .ok_or_else(|| ProxyError::NoAddress("container reported no non-empty network address".to_string()))
}

/// Forwards `request` to `upstream_url`, streaming the body both ways and
/// copying headers/status with the stripped sets above applied.
pub async fn forward(client: &reqwest::Client, upstream_url: &str, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
    let (parts, body) = request.into_parts();

    let mut upstream_request = client.request(parts.method.clone(), upstream_url);
    for (name, value) in parts.headers.iter() {
        if STRIPPED_REQUEST_HEADERS.iter().any(|stripped| name.as_str().eq_ignore_ascii_case(stripped)) {
            continue;
        }
        upstream_request = upstream_request.header(name, value);
    }

    upstream_request = upstream_request.body(reqwest::Body::wrap_stream(body.into_data_stream()));

    let upstream_response = upstream_request.send().await?;
    let status = StatusCode::from_u16(upstream_response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut headers = HeaderMap::new();
    for (name, value) in upstream_response.headers().iter() {
        if STRIPPED_RESPONSE_HEADERS.iter().any(|stripped| name.as_str().eq_ignore_ascii_case(stripped)) {
            continue;
        }
        if let Ok(name) = HeaderName::from_bytes(name.as_str().as_bytes()) {
            headers.append(name, value.clone());
        }
    }

    let stream = upstream_response.bytes_stream();
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Resolves `state`'s first running address, builds the upstream URL, and
/// forwards `request` to it — the shape an axum handler wrapping this
/// module would return directly, converting any failure into the
/// crate-wide error taxonomy instead of a bare [`ProxyError`].
pub async fn proxy_to_container(
    client: &reqwest::Client,
    state: &ContainerNetworkState,
    path: &str,
    query: &str,
    request: Request<Body>,
) -> Result<Response<Body>, OrchestratorError> {
    let ip = first_address(state)?;
    let url = upstream_url(ip, path, query);
    let response = forward(client, &url, request).await?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_running_true_with_multiple_addresses() {
        let state = parse_inspect_format("true|10.0.0.5|172.18.0.3|");
        assert!(state.running);
        assert_eq!(state.addresses, vec!["10.0.0.5", "172.18.0.3"]);
    }

    #[test]
    fn parses_not_running_with_no_addresses() {
        let state = parse_inspect_format("false|");
        assert!(!state.running);
        assert!(state.addresses.is_empty());
    }

    #[test]
    fn first_address_rejects_a_stopped_container() {
        let state = ContainerNetworkState { running: false, addresses: vec!["10.0.0.5".into()] };
        assert!(matches!(first_address(&state), Err(ProxyError::NotRunning)));
    }

    #[test]
    fn first_address_rejects_an_empty_address_list() {
        let state = ContainerNetworkState { running: true, addresses: vec![] };
        assert!(matches!(first_address(&state), Err(ProxyError::NoAddress(_))));
    }

    #[test]
    fn upstream_url_strips_only_the_auth_token() {
        let url = upstream_url("10.0.0.5", "/api/widgets", "token=abc&page=2");
        assert_eq!(url, "http://10.0.0.5:80/api/widgets?page=2");
    }
}
