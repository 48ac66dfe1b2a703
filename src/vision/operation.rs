// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read job handles derived from `Operation-Location` headers

use std::fmt;

use super::errors::VisionError;

/// An in-flight asynchronous read operation on the provider side
///
/// Created once per submission and never shared between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadJob {
    operation_id: String,
    location: String,
}

impl ReadJob {
    /// Build a job from the location token returned by the submit call
    pub fn from_location(location: Option<&str>) -> Result<Self, VisionError> {
        let operation_id = extract_operation_id(location)?;
        Ok(Self {
            operation_id,
            location: location.unwrap_or_default().trim().to_string(),
        })
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for ReadJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.operation_id)
    }
}

/// Extract the operation id: the last non-empty `/`-separated segment
///
/// Anything after `?` or `#` is ignored. An absent, blank, or segment-less
/// location is a `MalformedLocation` error.
pub fn extract_operation_id(location: Option<&str>) -> Result<String, VisionError> {
    let malformed = || VisionError::MalformedLocation {
        location: location.map(str::to_string),
    };

    let raw = location.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
        .ok_or_else(malformed)
}
