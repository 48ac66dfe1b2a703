// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::vision::VisionError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    NotFound(String),
    ValidationError {
        field: String,
        message: String,
    },
    /// The provider rejected the image itself (format, size, content)
    UnprocessableImage {
        code: String,
        message: String,
    },
    JobFailed {
        operation_id: String,
        diagnostic: String,
    },
    BadGateway(String),
    ServiceUnavailable(String),
    Timeout,
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::UnprocessableImage { code, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "provider_code".to_string(),
                    serde_json::Value::String(code.clone()),
                );
                ("unprocessable_image", message.clone(), Some(details))
            }
            ApiError::JobFailed {
                operation_id,
                diagnostic,
            } => {
                let mut details = HashMap::new();
                details.insert(
                    "operation_id".to_string(),
                    serde_json::Value::String(operation_id.clone()),
                );
                ("job_failed", diagnostic.clone(), Some(details))
            }
            ApiError::BadGateway(msg) => ("bad_gateway", msg.clone(), None),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone(), None),
            ApiError::Timeout => ("timeout", "Request timed out".to_string(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::ValidationError { .. } => 400,
            ApiError::UnprocessableImage { .. } | ApiError::JobFailed { .. } => 422,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::Timeout => 504,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::UnprocessableImage { code, message } => {
                write!(f, "Image rejected by provider ({}): {}", code, message)
            }
            ApiError::JobFailed {
                operation_id,
                diagnostic,
            } => write!(f, "Read job {} failed: {}", operation_id, diagnostic),
            ApiError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<VisionError> for ApiError {
    fn from(error: VisionError) -> Self {
        match error {
            VisionError::IoUnavailable { path, .. } => {
                ApiError::NotFound(format!("Image not found: {}", path))
            }
            VisionError::Provider {
                status,
                code,
                message,
            } if (400..500).contains(&status) && !matches!(status, 401 | 403 | 429) => {
                ApiError::UnprocessableImage { code, message }
            }
            VisionError::JobFailed {
                operation_id,
                diagnostic,
            } => ApiError::JobFailed {
                operation_id,
                diagnostic,
            },
            VisionError::TimedOut { .. } => ApiError::Timeout,
            e @ VisionError::Polling { .. } => ApiError::ServiceUnavailable(e.to_string()),
            e @ VisionError::Cancelled { .. } => ApiError::ServiceUnavailable(e.to_string()),
            e => ApiError::BadGateway(e.to_string()),
        }
    }
}

/// Error response carrying the request id of the failed call
#[derive(Debug)]
pub struct ApiErrorResponse {
    pub error: ApiError,
    pub request_id: Option<String>,
}

impl ApiErrorResponse {
    pub fn new(error: ApiError, request_id: impl Into<String>) -> Self {
        Self {
            error,
            request_id: Some(request_id.into()),
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.error.to_response(self.request_id);

        (status, Json(error_response)).into_response()
    }
}
