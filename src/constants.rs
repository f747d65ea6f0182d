// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

/// Service name used in the SigV4 credential scope.
pub const SIGNING_SERVICE: &str = "es";
/// Signing timestamps are backdated to tolerate caller/server clock drift.
pub const SIGNING_CLOCK_SKEW: Duration = Duration::from_secs(10);
/// Sessions within this buffer of credential expiry are treated as expired.
pub const CREDENTIAL_REFRESH_BUFFER: Duration = Duration::from_secs(60);
/// Session name recorded in CloudTrail for assumed-role sessions.
pub const ASSUME_ROLE_SESSION_NAME: &str = "es-gateway";
/// Key of the VPC endpoint in the domain status endpoint map.
pub const VPC_ENDPOINT_KEY: &str = "vpc";
/// Forwarded request bodies are buffered for signing; cap the buffer.
pub const MAX_FORWARD_BODY_BYTES: usize = 10 * 1024 * 1024; // 10 MB
