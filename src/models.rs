// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one search domain: a cached proxy exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainKey {
    pub region: String,
    pub domain: String,
}

impl DomainKey {
    pub fn new(region: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            domain: domain.into(),
        }
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.domain)
    }
}

/// Response body for the domain listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainList {
    pub domains: Vec<String>,
}
