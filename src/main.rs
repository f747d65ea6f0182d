// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::Parser;
use es_gateway::application::Application;
use es_gateway::configuration::GatewayOptions;
use es_gateway::manager::SearchGateway;
use std::{io::Error, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    println!("[gateway] init");

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from environment variables
    let options = GatewayOptions::parse();

    tracing::info!("[gateway] {:?}", &options);

    // a failed gateway setup must surface as an error result at the
    // boundary, not a panic
    let gateway = Arc::new(SearchGateway::new(options.role.clone()).map_err(Error::other)?);

    let application = Application::build(options, gateway).await?;

    application.run_until_stopped().await
}
