// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Domain listing and endpoint resolution against the ES management plane.
//!
//! Resolution issues one describe-domain call and picks the domain's public
//! endpoint when present, falling back to the VPC-attached endpoint. A
//! domain with no status or no usable endpoint string resolves to
//! [`AppError::DomainNotFound`] — "absent" and "present-but-unreachable"
//! are surfaced the same way.

use aws_sdk_elasticsearch::Client;
use aws_sdk_elasticsearch::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_elasticsearch::operation::describe_elasticsearch_domain::DescribeElasticsearchDomainError;
use aws_sdk_elasticsearch::types::{DomainInfo, ElasticsearchDomainStatus};

use crate::constants;
use crate::errors::AppError;

/// Lists the domain names in the client's region, lexicographically
/// ascending regardless of the order the management plane returns.
pub async fn list_domain_names(client: &Client) -> Result<Vec<String>, AppError> {
    let output = client
        .list_domain_names()
        .send()
        .await
        .map_err(pass_through)?;

    Ok(sorted_domain_names(output.domain_names()))
}

/// Resolves `domain` to its current endpoint host.
pub async fn resolve_endpoint(client: &Client, domain: &str) -> Result<String, AppError> {
    let output = client
        .describe_elasticsearch_domain()
        .domain_name(domain)
        .send()
        .await
        .map_err(map_describe_error)?;

    output
        .domain_status()
        .and_then(endpoint_from_status)
        .ok_or(AppError::DomainNotFound)
}

fn sorted_domain_names(infos: &[DomainInfo]) -> Vec<String> {
    let mut names: Vec<String> = infos
        .iter()
        .filter_map(DomainInfo::domain_name)
        .map(str::to_string)
        .collect();
    names.sort_unstable();
    names
}

/// Public endpoint preferred, VPC endpoint otherwise. Empty strings do not
/// count as endpoints.
fn endpoint_from_status(status: &ElasticsearchDomainStatus) -> Option<String> {
    if let Some(endpoint) = status.endpoint()
        && !endpoint.is_empty()
    {
        return Some(endpoint.to_string());
    }

    status
        .endpoints()?
        .get(constants::VPC_ENDPOINT_KEY)
        .filter(|endpoint| !endpoint.is_empty())
        .cloned()
}

fn map_describe_error(err: SdkError<DescribeElasticsearchDomainError>) -> AppError {
    match err.as_service_error().and_then(classify) {
        Some(mapped) => mapped,
        None => AppError::Provider(Box::new(err)),
    }
}

/// Maps well-known management-plane error codes onto the local taxonomy;
/// everything else passes through unchanged.
fn classify<E>(err: &E) -> Option<AppError>
where
    E: ProvideErrorMetadata,
{
    match err.code() {
        Some("ResourceNotFoundException") => Some(AppError::DomainNotFound),
        Some("ValidationException") => Some(AppError::InvalidDomainName),
        _ => None,
    }
}

fn pass_through<E>(err: SdkError<E>) -> AppError
where
    SdkError<E>: std::error::Error + Send + Sync + 'static,
{
    AppError::Provider(Box::new(err))
}
