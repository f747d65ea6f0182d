// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers for the gateway API.
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | `/health` | [`health`] | Health check endpoint |
//! | GET | `/domains/{region}` | [`list_domains`] | List domains in a region |
//! | DELETE | `/proxies/{region}/{domain}` | [`invalidate_proxy`] | Drop a cached proxy |
//! | ANY | `/{region}/{domain}` | [`forward_root`] | Signed forward to the domain root |
//! | ANY | `/{region}/{domain}/{*path}` | [`forward`] | Signed forward to a domain path |

use std::sync::Arc;

use crate::application::AppState;
use crate::errors::AppError;
use crate::models::DomainList;

use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Health check endpoint.
///
/// # Response
///
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Lists the search domains in a region, lexicographically ascending.
#[tracing::instrument(skip(state))]
pub async fn list_domains(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
) -> Result<Json<DomainList>, AppError> {
    let domains = state.gateway.list_domains(&region).await?;

    Ok(Json(DomainList { domains }))
}

/// Drops the cached proxy for a domain so the next request re-resolves its
/// endpoint. Idempotent.
#[tracing::instrument(skip(state))]
pub async fn invalidate_proxy(
    State(state): State<Arc<AppState>>,
    Path((region, domain)): Path<(String, String)>,
) -> StatusCode {
    state.gateway.invalidate_proxy(&region, &domain).await;
    StatusCode::NO_CONTENT
}

/// Forwards a request to the domain root (`/`).
pub async fn forward_root(
    State(state): State<Arc<AppState>>,
    Path((region, domain)): Path<(String, String)>,
    req: Request,
) -> Result<Response, AppError> {
    let target = upstream_path("", req.uri().query());
    let proxy = state.gateway.get_proxy(&region, &domain).await?;
    proxy.forward(&target, req).await
}

/// Forwards a request to a path on the domain, preserving the query string.
pub async fn forward(
    State(state): State<Arc<AppState>>,
    Path((region, domain, path)): Path<(String, String, String)>,
    req: Request,
) -> Result<Response, AppError> {
    let target = upstream_path(&path, req.uri().query());
    let proxy = state.gateway.get_proxy(&region, &domain).await?;
    proxy.forward(&target, req).await
}

/// Rebuilds the upstream path-and-query from the wildcard segment and the
/// inbound query string.
fn upstream_path(path: &str, query: Option<&str>) -> String {
    let mut target = String::with_capacity(1 + path.len());
    target.push('/');
    target.push_str(path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    // Unit tests for route handlers (testing handler functions directly)
    // Integration tests using TestServer are in tests/http_integration.rs

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[test]
    fn test_upstream_path_for_domain_root() {
        assert_eq!(upstream_path("", None), "/");
        assert_eq!(upstream_path("", Some("pretty=true")), "/?pretty=true");
    }

    #[test]
    fn test_upstream_path_preserves_path_and_query() {
        assert_eq!(upstream_path("logs/_search", None), "/logs/_search");
        assert_eq!(
            upstream_path("logs/_search", Some("size=10&from=20")),
            "/logs/_search?size=10&from=20"
        );
    }
}
