// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # ES Gateway
//!
//! A signing reverse proxy for Amazon Elasticsearch Service domains.
//!
//! This crate provides an HTTP gateway that forwards arbitrary requests to
//! IAM-gated Elasticsearch domains on behalf of callers who cannot hold the
//! required temporary credentials themselves. Every forwarded request is
//! rewritten to target the domain's resolved endpoint and signed with SigV4.
//!
//! ## Architecture
//!
//! ```text
//! Client -> HTTP API -> Gateway (this crate) -> SigV4 -> ES domain endpoint
//!                            |
//!                            +-> ES management plane (list/describe domains)
//!                            +-> STS (optional assume-role)
//! ```
//!
//! The gateway keeps two concurrent caches:
//!
//! - **Session cache**: one authenticated session per region, re-created
//!   lazily when its credentials expire
//! - **Proxy cache**: one forwarding handler per (region, domain), bound to
//!   the endpoint resolved at construction time
//!
//! ## Modules
//!
//! - [`application`]: HTTP server setup with Axum
//! - [`cache`]: reader/writer-locked cache shared by sessions and proxies
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: configuration constants for the application
//! - [`endpoints`]: domain listing and endpoint resolution
//! - [`errors`]: application error types with HTTP response mapping
//! - [`manager`]: the gateway surface (list domains, get/invalidate proxy)
//! - [`models`]: cache keys and response types
//! - [`proxy`]: request rewriting, SigV4 signing, and forwarding
//! - [`routes`]: HTTP route handlers
//! - [`sessions`]: per-region session cache and client factory
//!
//! ## Usage
//!
//! ```bash
//! es-gateway --host 127.0.0.1 --port 8080 --role arn:aws:iam::123456789012:role/search-access
//! ```

pub mod application;
pub mod cache;
pub mod configuration;
pub mod constants;
pub mod endpoints;
pub mod errors;
pub mod manager;
pub mod models;
pub mod proxy;
pub mod routes;
pub mod sessions;
