// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP integration tests for the gateway API.
//!
//! These tests use `axum-test` to test the full HTTP request/response cycle
//! through the Axum router. Routes that reach the ES management plane are
//! covered by unit tests against seeded caches instead; nothing here
//! touches the network.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum_test::TestServer;
use es_gateway::application::create_router;
use es_gateway::configuration::GatewayOptions;
use es_gateway::manager::SearchGateway;

/// Creates a test server with default options and an empty gateway.
fn create_test_server() -> TestServer {
    let options = GatewayOptions::default();
    let gateway = Arc::new(SearchGateway::new(None).unwrap());
    let app = create_router(options, gateway);
    TestServer::new(app).unwrap()
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_200() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_health_endpoint_returns_status_ok_body() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_json(&serde_json::json!({"status": "ok"}));
}

// =============================================================================
// Routing Tests
// =============================================================================

/// The listing route only accepts GET.
#[tokio::test]
async fn test_domains_endpoint_rejects_post() {
    let server = create_test_server();
    let response = server.post("/domains/us-east-1").await;
    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}

/// A bare region segment matches no route.
#[tokio::test]
async fn test_unknown_route_returns_404() {
    let server = create_test_server();
    let response = server.get("/us-east-1").await;
    response.assert_status_not_found();
}

// =============================================================================
// Proxy Invalidation Tests
// =============================================================================

/// Invalidation is idempotent: dropping an entry that was never cached
/// still succeeds.
#[tokio::test]
async fn test_invalidate_proxy_returns_204() {
    let server = create_test_server();
    let response = server.delete("/proxies/us-east-1/logs-prod").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);
}

/// The invalidation route only accepts DELETE.
#[tokio::test]
async fn test_invalidate_proxy_rejects_get() {
    let server = create_test_server();
    let response = server.get("/proxies/us-east-1/logs-prod").await;
    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
