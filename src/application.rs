// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::configuration::GatewayOptions;
use crate::manager::SearchGateway;
use crate::routes;
use axum::Router;
use axum::routing::{any, delete, get};
use axum::serve::Serve;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub options: GatewayOptions,
    pub gateway: Arc<SearchGateway>,
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(
        options: GatewayOptions,
        gateway: Arc<SearchGateway>,
    ) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", options.host, options.port);
        let listener = TcpListener::bind(address).await?;
        let server = axum::serve(listener, create_router(options.clone(), gateway));
        let port = server.local_addr()?.port();

        tracing::info!("[gateway] listening at http://{}:{}", options.host, port);

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn create_router(options: GatewayOptions, gateway: Arc<SearchGateway>) -> Router {
    let state = Arc::new(AppState { options, gateway });

    Router::new()
        .route("/health", get(routes::health))
        .route("/domains/{region}", get(routes::list_domains))
        .route("/proxies/{region}/{domain}", delete(routes::invalidate_proxy))
        .route("/{region}/{domain}", any(routes::forward_root))
        .route("/{region}/{domain}/{*path}", any(routes::forward))
        .with_state(state)
}
