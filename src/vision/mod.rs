// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cloud vision provider integration
//!
//! This module provides:
//! - A client for the provider's analyze and read endpoints
//! - The read-result poller that drives asynchronous OCR jobs to completion
//! - Response models mirrored from the provider's JSON

pub mod client;
pub mod errors;
pub mod features;
pub mod models;
pub mod operation;
pub mod poller;
pub mod summary;

pub use client::{ReadOperations, VisionClient};
pub use errors::VisionError;
pub use features::{AnalysisRequest, ImageDetail, VisualFeature};
pub use models::{ImageAnalysis, ReadOperationResult, ReadStatus};
pub use operation::{extract_operation_id, ReadJob};
pub use poller::{collect_text, PollerConfig, ReadPoller, ReadTask};
pub use summary::{has_people_category, log_analysis};

/// Read a local image, mapping failures to `IoUnavailable`
pub async fn read_image(path: &str) -> Result<Vec<u8>, VisionError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| VisionError::IoUnavailable {
            path: path.to_string(),
            source,
        })
}
