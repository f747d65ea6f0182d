// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! The gateway surface: domain listing and cached signing proxies.
//!
//! [`SearchGateway`] owns the client factory and the per-(region, domain)
//! proxy cache. Building a proxy resolves the domain endpoint through the
//! management plane and binds a signer to the session's credential
//! provider; once built, a proxy is served for the process lifetime unless
//! explicitly invalidated.
//!
//! Lock order: the proxy cache's exclusive lock is taken first and the
//! session cache's locks nest inside it (proxy construction looks up a
//! session). No path acquires them in the opposite order.

use std::sync::Arc;

use aws_sdk_elasticsearch::Client;

use crate::cache::SharedCache;
use crate::endpoints;
use crate::errors::AppError;
use crate::models::DomainKey;
use crate::proxy::{DomainProxy, RequestSigner};
use crate::sessions::ClientFactory;

pub struct SearchGateway {
    factory: ClientFactory,
    proxies: SharedCache<DomainKey, Arc<DomainProxy>>,
    http: reqwest::Client,
}

impl SearchGateway {
    /// `role` is an IAM role ARN assumed for every management-plane and
    /// signing credential when set.
    pub fn new(role: Option<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("http client setup failed: {e}")))?;

        Ok(Self {
            factory: ClientFactory::new(role),
            proxies: SharedCache::new(),
            http,
        })
    }

    /// Lists the domain names in `region`, ascending.
    pub async fn list_domains(&self, region: &str) -> Result<Vec<String>, AppError> {
        let client = self.factory.get(region).await?;
        endpoints::list_domain_names(&client).await
    }

    /// Returns the forwarding handler for `(region, domain)`, building and
    /// caching it on first use. Repeated calls return the same handler
    /// instance.
    pub async fn get_proxy(
        &self,
        region: &str,
        domain: &str,
    ) -> Result<Arc<DomainProxy>, AppError> {
        let key = DomainKey::new(region, domain);

        // read lock to check the proxy cache
        if let Some(proxy) = self.proxies.get_if(&key, |_| true).await {
            return Ok(proxy);
        }

        // write lock to construct a new proxy (if a concurrent writer has
        // not already stored one)
        self.proxies
            .get_or_create(key, |_| true, || self.build_proxy(region, domain))
            .await
    }

    /// Drops the cached proxy for `(region, domain)`, forcing the next
    /// `get_proxy` to re-resolve the endpoint. Returns whether an entry was
    /// present.
    pub async fn invalidate_proxy(&self, region: &str, domain: &str) -> bool {
        let removed = self
            .proxies
            .remove(&DomainKey::new(region, domain))
            .await
            .is_some();
        if removed {
            tracing::info!("[gateway] invalidated proxy for {}/{}", region, domain);
        }
        removed
    }

    async fn build_proxy(&self, region: &str, domain: &str) -> Result<Arc<DomainProxy>, AppError> {
        let session = self.factory.session(region).await?;
        let client = Client::new(session.config());
        let endpoint = endpoints::resolve_endpoint(&client, domain).await?;

        let credentials = session.config().credentials_provider().ok_or_else(|| {
            AppError::ConfigError("session has no credentials provider".to_string())
        })?;

        tracing::debug!(
            "[gateway] built proxy for {}/{} -> {}",
            region,
            domain,
            endpoint
        );

        Ok(Arc::new(DomainProxy::new(
            RequestSigner::new(region, endpoint, credentials),
            self.http.clone(),
        )))
    }
}
