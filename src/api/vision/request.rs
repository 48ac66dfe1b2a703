// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision request parameters and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Query string shared by every vision endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePathQuery {
    /// Path of the local image to analyse
    #[serde(default)]
    pub image_path: Option<String>,
}

impl ImagePathQuery {
    /// Pick the requested path, falling back to the configured default
    pub fn resolve(&self, default_path: Option<&str>) -> Result<String, ApiError> {
        let requested = self
            .image_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        requested
            .or_else(|| default_path.map(str::trim).filter(|p| !p.is_empty()))
            .map(str::to_string)
            .ok_or_else(|| ApiError::ValidationError {
                field: "imagePath".to_string(),
                message: "imagePath is required".to_string(),
            })
    }
}
