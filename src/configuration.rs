// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct GatewayOptions {
    #[arg(long, default_value = "127.0.0.1", env("ESGW_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value = "8080", env("ESGW_HTTP_PORT"))]
    pub port: u16,
    /// IAM role ARN to assume for management-plane calls and request signing
    #[arg(long, env("ESGW_ROLE_ARN"))]
    pub role: Option<String>,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        GatewayOptions {
            host: "127.0.0.1".to_string(),
            port: 8080,
            role: None,
        }
    }
}
