// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Request rewriting, SigV4 signing, and forwarding.
//!
//! A [`DomainProxy`] relays inbound requests to one resolved domain
//! endpoint. Its [`RequestSigner`] rewrites each request before forwarding:
//! all inbound headers and the inbound `Host` are dropped (they would
//! conflict with the signature and the upstream virtual-host routing), the
//! target becomes `https://{endpoint}`, the body is buffered (the signature
//! covers the body digest, so it must be complete before signing), and the
//! SigV4 headers are computed over the final wire form.
//!
//! Signing timestamps are backdated by [`constants::SIGNING_CLOCK_SKEW`] to
//! tolerate clock drift between this host and the signature validator.
//!
//! The signer resolves credentials from the session's shared provider on
//! every request; the provider caches and refreshes internally, so a proxy
//! outlives the temporary credentials it was built with.

use std::time::SystemTime;

use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{
    SignableBody, SignableRequest, SignatureLocation, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use axum::body::{Body, Bytes, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use axum::response::Response;

use crate::constants;
use crate::errors::AppError;

/// Rewrite-and-sign strategy bound to one region, endpoint, and credential
/// source.
pub struct RequestSigner {
    region: String,
    endpoint: String,
    credentials: SharedCredentialsProvider,
}

impl RequestSigner {
    pub fn new(
        region: impl Into<String>,
        endpoint: impl Into<String>,
        credentials: SharedCredentialsProvider,
    ) -> Self {
        Self {
            region: region.into(),
            endpoint: endpoint.into(),
            credentials,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Produces the rewritten target URL and the complete outgoing header
    /// set: the endpoint `Host` plus the SigV4 signature headers. Nothing
    /// from the inbound request is carried over except method, path, query,
    /// and body.
    pub async fn rewrite_and_sign(
        &self,
        method: &Method,
        path_and_query: &str,
        body: &Bytes,
    ) -> Result<(String, HeaderMap), AppError> {
        let signed_at = SystemTime::now()
            .checked_sub(constants::SIGNING_CLOCK_SKEW)
            .unwrap_or_else(SystemTime::now);
        self.rewrite_and_sign_at(method, path_and_query, body, signed_at)
            .await
    }

    async fn rewrite_and_sign_at(
        &self,
        method: &Method,
        path_and_query: &str,
        body: &Bytes,
        signed_at: SystemTime,
    ) -> Result<(String, HeaderMap), AppError> {
        let url = format!("https://{}{}", self.endpoint, path_and_query);

        let credentials = self.credentials.provide_credentials().await?;
        let identity: Identity = credentials.into();

        let mut settings = SigningSettings::default();
        settings.signature_location = SignatureLocation::Headers;

        let signing_params = v4::signing_params::Builder::default()
            .identity(&identity)
            .region(&self.region)
            .name(constants::SIGNING_SERVICE)
            .time(signed_at)
            .settings(settings)
            .build()
            .map_err(|e| AppError::SigningError(e.to_string()))?
            .into();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::HOST,
            HeaderValue::from_str(&self.endpoint)
                .map_err(|e| AppError::SigningError(e.to_string()))?,
        );

        let signable = SignableRequest::new(
            method.as_str(),
            &url,
            headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or(""))),
            SignableBody::Bytes(body.as_ref()),
        )
        .map_err(|e| AppError::SigningError(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|e| AppError::SigningError(e.to_string()))?
            .into_parts();

        for (name, value) in instructions.headers() {
            let name = HeaderName::try_from(name)
                .map_err(|e| AppError::SigningError(e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::SigningError(e.to_string()))?;
            headers.insert(name, value);
        }

        Ok((url, headers))
    }

    /// Response seam; passes the upstream response through untouched.
    pub fn post_process(&self, response: Response) -> Result<Response, AppError> {
        Ok(response)
    }
}

/// Forwarding handler for one (region, domain); reusable across requests
/// and callers.
pub struct DomainProxy {
    signer: RequestSigner,
    http: reqwest::Client,
}

impl DomainProxy {
    pub fn new(signer: RequestSigner, http: reqwest::Client) -> Self {
        Self { signer, http }
    }

    pub fn endpoint(&self) -> &str {
        self.signer.endpoint()
    }

    /// Rewrites, signs, and relays `req` to the domain endpoint at
    /// `path_and_query`, returning the upstream response.
    ///
    /// A body that cannot be buffered fails the request; an unsigned
    /// forward would only be rejected upstream with less context.
    #[tracing::instrument(skip(self, req), fields(endpoint = %self.endpoint()))]
    pub async fn forward(&self, path_and_query: &str, req: Request) -> Result<Response, AppError> {
        let (parts, body) = req.into_parts();
        let body = to_bytes(body, constants::MAX_FORWARD_BODY_BYTES)
            .await
            .map_err(|e| AppError::BodyError(e.to_string()))?;

        let (url, headers) = self
            .signer
            .rewrite_and_sign(&parts.method, path_and_query, &body)
            .await?;

        tracing::debug!("[gateway] forwarding {} {}", parts.method, url);

        let upstream = self
            .http
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let response = into_response(upstream).await?;
        self.signer.post_process(response)
    }
}

async fn into_response(upstream: reqwest::Response) -> Result<Response, AppError> {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    // the body is re-buffered, so the upstream framing headers no longer apply
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);
    headers.remove(header::CONTENT_LENGTH);

    let body = upstream.bytes().await?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aws_credential_types::Credentials;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use std::time::Duration;

    fn test_signer(region: &str, endpoint: &str) -> RequestSigner {
        let credentials = Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            None,
            None,
            "test",
        );
        RequestSigner::new(
            region,
            endpoint,
            SharedCredentialsProvider::new(credentials),
        )
    }

    fn parse_amz_date(value: &str) -> SystemTime {
        let parsed = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ").unwrap();
        SystemTime::from(DateTime::<Utc>::from_naive_utc_and_offset(parsed, Utc))
    }

    #[tokio::test]
    async fn test_rewrite_targets_endpoint_over_https() {
        let signer = test_signer("us-east-1", "vpc-logs-prod.example-provider.net");
        let body = Bytes::from_static(br#"{"query":{"match_all":{}}}"#);

        let (url, headers) = signer
            .rewrite_and_sign(&Method::POST, "/logs/_search?size=10", &body)
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://vpc-logs-prod.example-provider.net/logs/_search?size=10"
        );
        assert_eq!(
            headers.get(header::HOST).unwrap(),
            "vpc-logs-prod.example-provider.net"
        );
    }

    #[tokio::test]
    async fn test_signature_scopes_region_and_service() {
        let signer = test_signer("us-east-1", "vpc-logs-prod.example-provider.net");
        let body = Bytes::new();

        let (_url, headers) = signer
            .rewrite_and_sign(&Method::GET, "/_cluster/health", &body)
            .await
            .unwrap();

        let authorization = headers
            .get(header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(authorization.contains("/us-east-1/es/aws4_request"));
        assert!(authorization.contains("SignedHeaders=host;x-amz-date"));
    }

    #[tokio::test]
    async fn test_only_signing_headers_are_emitted() {
        // the inbound header set never reaches the signer; whatever the
        // caller sent, the wire carries only the host and signature headers
        let signer = test_signer("us-east-1", "vpc-logs-prod.example-provider.net");
        let body = Bytes::from_static(b"{}");

        let (_url, headers) = signer
            .rewrite_and_sign(&Method::POST, "/logs/_doc", &body)
            .await
            .unwrap();

        let allowed = [
            "host",
            "x-amz-date",
            "authorization",
            "x-amz-security-token",
            "x-amz-content-sha256",
        ];
        for name in headers.keys() {
            assert!(
                allowed.contains(&name.as_str()),
                "unexpected outgoing header: {name}"
            );
        }
        assert!(headers.get("x-amz-date").is_some());
    }

    #[tokio::test]
    async fn test_signing_timestamp_is_backdated() {
        let signer = test_signer("us-east-1", "vpc-logs-prod.example-provider.net");
        let body = Bytes::new();

        let before = SystemTime::now();
        let (_url, headers) = signer
            .rewrite_and_sign(&Method::GET, "/", &body)
            .await
            .unwrap();
        let after = SystemTime::now();

        let signed_at = parse_amz_date(headers.get("x-amz-date").unwrap().to_str().unwrap());

        // x-amz-date truncates to whole seconds, so allow one second of slack
        let earliest = before - constants::SIGNING_CLOCK_SKEW - Duration::from_secs(1);
        let latest = after - constants::SIGNING_CLOCK_SKEW;
        assert!(signed_at >= earliest, "signed too far in the past");
        assert!(signed_at <= latest, "signature not backdated");
    }

    #[tokio::test]
    async fn test_session_token_is_attached_when_present() {
        let credentials = Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            Some("FwoGZXIvYXdzEXAMPLETOKEN".to_string()),
            None,
            "test",
        );
        let signer = RequestSigner::new(
            "eu-west-1",
            "search-logs.example-provider.net",
            SharedCredentialsProvider::new(credentials),
        );

        let (_url, headers) = signer
            .rewrite_and_sign(&Method::GET, "/", &Bytes::new())
            .await
            .unwrap();

        assert_eq!(
            headers.get("x-amz-security-token").unwrap(),
            "FwoGZXIvYXdzEXAMPLETOKEN"
        );
    }

    #[tokio::test]
    async fn test_post_process_leaves_response_untouched() {
        let signer = test_signer("us-east-1", "search-logs.example-provider.net");
        let mut response = Response::new(Body::from("{\"took\":3}"));
        response
            .headers_mut()
            .insert("x-elapsed", HeaderValue::from_static("3ms"));

        let processed = signer.post_process(response).unwrap();

        assert_eq!(processed.status(), axum::http::StatusCode::OK);
        assert_eq!(processed.headers().get("x-elapsed").unwrap(), "3ms");
    }
}
