// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_credential_types::provider::error::CredentialsError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("search domain not found")]
    DomainNotFound,
    #[error("invalid search domain name")]
    InvalidDomainName,
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("request signing failed: {0}")]
    SigningError(String),
    #[error("failed to read request body: {0}")]
    BodyError(String),
    /// Management-plane errors with no local mapping, passed through unchanged.
    #[error(transparent)]
    Provider(Box<dyn std::error::Error + Send + Sync>),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("internal server error")]
    InternalServerError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::DomainNotFound => (StatusCode::NOT_FOUND, "Search domain not found".to_string()),
            Self::InvalidDomainName => (
                StatusCode::BAD_REQUEST,
                "Invalid search domain name".to_string(),
            ),
            Self::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::SigningError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Request signing failed".to_string(),
            ),
            Self::BodyError(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Provider(source) => {
                tracing::error!("[gateway] provider error: {:?}", source);
                (StatusCode::BAD_GATEWAY, "Upstream provider error".to_string())
            }
            Self::Upstream(source) => {
                tracing::error!("[gateway] upstream request failed: {:?}", source);
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        let body = Json(json!({"code": status.as_u16(), "message": message}));

        (status, body).into_response()
    }
}

impl From<CredentialsError> for AppError {
    fn from(source: CredentialsError) -> Self {
        tracing::error!("{:?}", source);
        AppError::Provider(Box::new(source))
    }
}
