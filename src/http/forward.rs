//! Request forwarding to remote functions.
//!
//! # Responsibilities
//! - Build one outbound request per inbound request from a fixed target
//! - Copy inbound headers (all values per key) onto the outbound request
//! - Stream the inbound body out and the remote body back, never buffering
//! - Relay the remote status and headers verbatim
//!
//! # Design Decisions
//! - The target URL and method come from configuration; the inbound path,
//!   query and method are not consulted
//! - `Host` is not copied; the transport derives it from the target URL
//! - A single shared `reqwest::Client` carries connection pooling and the
//!   configured timeouts; it holds no per-request state
//! - Dropping the handler future (caller went away) drops the outbound call
//! - Bodies are moved, never cloned, so each is released exactly once

use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, HttpBody};
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;
use thiserror::Error;
use url::Url;

use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// Failure to build or execute the outbound call.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid target method {0:?}")]
    InvalidMethod(String),

    #[error("invalid target url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ForwardError {
    /// True when no network call was attempted.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::InvalidMethod(_) | Self::InvalidUrl { .. })
    }
}

/// Where and how one route forwards its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget {
    /// Route name, for logs and metrics.
    pub name: String,
    /// Remote URL, parsed per request.
    pub url: String,
    /// Outbound method, parsed per request.
    pub method: String,
}

/// Shared forwarding transport.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Forward `request` to `target` and relay the outcome.
    ///
    /// Every failure before the remote status is known becomes a 500 carrying
    /// the failure description.
    pub async fn forward(&self, target: &ForwardTarget, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let request_id = request_id(request.headers()).to_string();
        let inbound_method = request.method().to_string();

        tracing::debug!(
            request_id = %request_id,
            route = %target.name,
            method = %inbound_method,
            path = %request.uri().path(),
            target = %target.url,
            "Forwarding request"
        );

        match self.try_forward(target, request).await {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id,
                    route = %target.name,
                    status = response.status().as_u16(),
                    "Relaying remote response"
                );
                metrics::record_request(
                    &target.name,
                    &inbound_method,
                    response.status().as_u16(),
                    start_time,
                );
                response
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    route = %target.name,
                    target = %target.url,
                    construction = e.is_construction(),
                    error = %e,
                    "Forwarding failed"
                );
                let response = ApiError::from(e).into_response();
                metrics::record_request(
                    &target.name,
                    &inbound_method,
                    response.status().as_u16(),
                    start_time,
                );
                response
            }
        }
    }

    async fn try_forward(
        &self,
        target: &ForwardTarget,
        request: Request<Body>,
    ) -> Result<Response, ForwardError> {
        let outbound = build_outbound(target, request)?;
        let upstream = self.client.execute(outbound).await?;
        Ok(relay(&target.name, upstream))
    }
}

/// Build the outbound request. The inbound body is consumed either way.
pub fn build_outbound(
    target: &ForwardTarget,
    request: Request<Body>,
) -> Result<reqwest::Request, ForwardError> {
    let method = reqwest::Method::from_bytes(target.method.as_bytes())
        .map_err(|_| ForwardError::InvalidMethod(target.method.clone()))?;
    let url = Url::parse(&target.url).map_err(|source| ForwardError::InvalidUrl {
        url: target.url.clone(),
        source,
    })?;

    let (parts, body) = request.into_parts();

    let mut outbound = reqwest::Request::new(method, url);
    *outbound.headers_mut() = copy_headers(&parts.headers);
    if body.size_hint().exact() != Some(0) {
        *outbound.body_mut() = Some(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    Ok(outbound)
}

/// Copy every inbound header, keeping every value per key, except `Host`.
pub fn copy_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        if name == header::HOST {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Turn the remote response into ours: same status, same headers, body
/// streamed through.
fn relay(route: &str, upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = upstream.headers().clone();

    let route: Arc<str> = Arc::from(route);
    let body = upstream.bytes_stream().inspect_err(move |e| {
        // Status and headers are already out; the connection is cut instead.
        tracing::warn!(route = %route, error = %e, "Remote body failed mid-relay");
    });

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Method};

    fn target(url: &str, method: &str) -> ForwardTarget {
        ForwardTarget {
            name: "test".into(),
            url: url.into(),
            method: method.into(),
        }
    }

    #[test]
    fn copy_keeps_duplicates_and_drops_host() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::HOST, HeaderValue::from_static("gateway.local"));
        inbound.append("x-test", HeaderValue::from_static("a"));
        inbound.append("x-test", HeaderValue::from_static("b"));
        inbound.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let copied = copy_headers(&inbound);
        assert!(copied.get(header::HOST).is_none());
        let values: Vec<_> = copied.get_all("x-test").iter().collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(copied[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn outbound_uses_configured_method_and_target() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/function-2/42?verbose=1")
            .body(Body::empty())
            .unwrap();

        let outbound =
            build_outbound(&target("http://remote.example/function-2", "DELETE"), request)
                .unwrap();
        assert_eq!(outbound.method(), reqwest::Method::DELETE);
        assert_eq!(outbound.url().as_str(), "http://remote.example/function-2");
        assert!(outbound.body().is_none());
    }

    #[test]
    fn non_empty_body_is_streamed() {
        let request = Request::builder()
            .method(Method::POST)
            .body(Body::from("{\"firstName\":\"Ada\"}"))
            .unwrap();

        let outbound = build_outbound(&target("http://remote.example/f", "POST"), request).unwrap();
        let body = outbound.body().expect("body forwarded");
        // Streamed bodies expose no in-memory bytes.
        assert!(body.as_bytes().is_none());
    }

    #[test]
    fn malformed_url_is_construction_error() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let err = build_outbound(&target("not a url", "GET"), request).unwrap_err();
        assert!(err.is_construction());
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn malformed_method_is_construction_error() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let err = build_outbound(&target("http://remote.example/f", "GE T"), request).unwrap_err();
        assert!(matches!(err, ForwardError::InvalidMethod(_)));
    }

    #[tokio::test]
    async fn malformed_target_yields_500_envelope() {
        let forwarder = Forwarder::new(reqwest::Client::new());
        let request = Request::builder().body(Body::empty()).unwrap();

        let response = forwarder.forward(&target("::nope::", "GET"), request).await;
        assert_eq!(response.status(), 500);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
}
