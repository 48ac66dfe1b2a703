// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: crate::version::VERSION_NUMBER.to_string(),
            issues: None,
        }
    }

    pub fn degraded(issues: Vec<String>) -> Self {
        Self {
            status: "degraded".to_string(),
            version: crate::version::VERSION_NUMBER.to_string(),
            issues: Some(issues),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /health
///
/// Always 200; reports `degraded` when the provider endpoint cannot be reached.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    if state.vision_client.health_check().await {
        Json(HealthResponse::healthy())
    } else {
        tracing::warn!(
            endpoint = %state.vision_client.endpoint(),
            "Vision provider unreachable"
        );
        Json(HealthResponse::degraded(vec![
            "Vision provider unreachable".to_string(),
        ]))
    }
}

/// GET /version
pub async fn version_handler() -> Json<serde_json::Value> {
    Json(crate::version::get_version_info())
}
