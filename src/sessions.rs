// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Per-region session cache and client factory.
//!
//! A session is the loaded [`SdkConfig`] for one region, optionally wrapped
//! with assumed-role temporary credentials. Sessions are constructed lazily
//! on first use, shared between concurrent callers, and re-created when
//! their credential material reports expired.
//!
//! Expiry is evaluated on every lookup, not on a timer. An expired entry is
//! evicted by being overwritten during the next populating write; there is
//! no background sweeping. Two concurrent misses for the same region may
//! both construct a session — the later write wins, which wastes one
//! construction but never hands out an invalid session.

use std::sync::Arc;
use std::time::SystemTime;

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_elasticsearch::Client;

use crate::cache::SharedCache;
use crate::constants;
use crate::errors::AppError;

/// One authenticated session and the credential material it resolved to.
pub struct CachedSession {
    config: SdkConfig,
    credentials: Option<Credentials>,
}

impl CachedSession {
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Whether the session's credentials are still usable.
    ///
    /// Static credentials (no expiry) are always fresh. Expiring credentials
    /// are considered stale once within [`constants::CREDENTIAL_REFRESH_BUFFER`]
    /// of their expiry.
    pub fn is_fresh(&self) -> bool {
        match self.credentials.as_ref().and_then(Credentials::expiry) {
            Some(expires_at) => SystemTime::now()
                .checked_add(constants::CREDENTIAL_REFRESH_BUFFER)
                .map(|threshold| threshold < expires_at)
                .unwrap_or(false),
            None => true,
        }
    }
}

/// An Elasticsearch client factory with a per-region session cache that
/// allows concurrent cached client sharing.
pub struct ClientFactory {
    role: Option<String>,
    sessions: SharedCache<String, Arc<CachedSession>>,
}

impl ClientFactory {
    /// `role` is an IAM role ARN; when set, every session's credentials are
    /// obtained by assuming it.
    pub fn new(role: Option<String>) -> Self {
        Self {
            role,
            sessions: SharedCache::new(),
        }
    }

    /// Returns a management-plane client for `region`, backed by the cached
    /// session or a freshly constructed one.
    pub async fn get(&self, region: &str) -> Result<Client, AppError> {
        let session = self.session(region).await?;
        Ok(Client::new(session.config()))
    }

    /// Returns the cached session for `region`, constructing and caching a
    /// new one on miss or credential expiry.
    pub async fn session(&self, region: &str) -> Result<Arc<CachedSession>, AppError> {
        // fast path: read lock, expiry evaluated per lookup
        if let Some(session) = self
            .sessions
            .get_if(&region.to_string(), |session| session.is_fresh())
            .await
        {
            return Ok(session);
        }

        // slow path: construct under the exclusive lock. No re-check: a
        // concurrent writer may have repaired the entry already, in which
        // case this write replaces one valid session with another.
        let role = self.role.clone();
        self.sessions
            .create(region.to_string(), || construct_session(region.to_string(), role))
            .await
    }
}

/// Loads a session for `region` and resolves its credentials once so the
/// cache can evaluate expiry.
async fn construct_session(
    region: String,
    role: Option<String>,
) -> Result<Arc<CachedSession>, AppError> {
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.clone()));

    let config = match role {
        Some(role_arn) => {
            let base = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.clone()))
                .load()
                .await;
            let provider = AssumeRoleProvider::builder(role_arn)
                .session_name(constants::ASSUME_ROLE_SESSION_NAME)
                .configure(&base)
                .build()
                .await;
            loader.credentials_provider(provider).load().await
        }
        None => loader.load().await,
    };

    let credentials = match config.credentials_provider() {
        Some(provider) => Some(
            provider
                .provide_credentials()
                .await
                .map_err(|e| AppError::ConfigError(format!("session setup failed: {e}")))?,
        ),
        None => None,
    };

    tracing::debug!(
        "[gateway] constructed session for region {}, expiry: {:?}",
        region,
        credentials.as_ref().and_then(Credentials::expiry)
    );

    Ok(Arc::new(CachedSession {
        config,
        credentials,
    }))
}
