// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision endpoint handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::request::ImagePathQuery;
use super::response::{people_message, read_text_body};
use crate::api::errors::{ApiError, ApiErrorResponse};
use crate::api::http_server::AppState;
use crate::vision::{has_people_category, log_analysis, read_image, ImageAnalysis, VisionError};

/// POST /api/vision/modelImage - Does the image contain people?
///
/// # Response
/// - 200 `People categories found` or `No people categories found`
///
/// # Errors
/// - 400 Bad Request: no `imagePath` and no configured default
/// - 404 Not Found: image file unreadable
/// - 422 / 502 / 503: provider rejected the image or is unreachable
pub async fn model_image_handler(
    State(state): State<AppState>,
    Query(query): Query<ImagePathQuery>,
) -> Result<&'static str, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    let image_path = resolve_path(&state, &query, &request_id)?;
    info!(request_id = %request_id, image_path = %image_path, "Model image check requested");

    let analysis = analyse_image(&state, &image_path)
        .await
        .map_err(|e| vision_failure(&request_id, e))?;

    let found = has_people_category(&analysis);
    info!(request_id = %request_id, found, "People category check complete");
    Ok(people_message(found))
}

/// POST /api/vision/analyse - Full structured analysis of the image
///
/// The body mirrors the provider's JSON (categories, adult, color,
/// imageType, tags, description, faces, metadata).
pub async fn analyse_handler(
    State(state): State<AppState>,
    Query(query): Query<ImagePathQuery>,
) -> Result<Json<ImageAnalysis>, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    let image_path = resolve_path(&state, &query, &request_id)?;
    info!(request_id = %request_id, image_path = %image_path, "Image analysis requested");

    let analysis = analyse_image(&state, &image_path)
        .await
        .map_err(|e| vision_failure(&request_id, e))?;

    Ok(Json(analysis))
}

/// POST /api/vision/readtext - Recognise text in the image
///
/// Submits a read job, polls it on a background task and returns
/// `Response: <text>` with all lines concatenated in provider order.
/// If the caller disconnects, the background poll is cancelled.
///
/// # Errors
/// - 404 Not Found: image file unreadable
/// - 422 Unprocessable Entity: provider rejected the image or failed the job
/// - 502 Bad Gateway: provider unreachable or returned no operation location
/// - 503 Service Unavailable: status queries kept failing, or shutdown
/// - 504 Gateway Timeout: job did not finish in time
pub async fn read_text_handler(
    State(state): State<AppState>,
    Query(query): Query<ImagePathQuery>,
) -> Result<String, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    let image_path = resolve_path(&state, &query, &request_id)?;
    info!(request_id = %request_id, image_path = %image_path, "Read text requested");

    let start = Instant::now();
    let image = read_image(&image_path)
        .await
        .map_err(|e| vision_failure(&request_id, e))?;

    let job = state
        .vision_client
        .submit_read(image, &state.config.read_language)
        .await
        .map_err(|e| vision_failure(&request_id, e))?;

    let task = state.poller.spawn_read_text(
        state.vision_client.clone(),
        job,
        state.shutdown.child_token(),
    );
    // Dropped with this future when the caller goes away
    let guard = task.cancellation_token().drop_guard();
    let result = task.wait().await;
    guard.disarm();

    let text = result.map_err(|e| vision_failure(&request_id, e))?;
    info!(
        request_id = %request_id,
        chars = text.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Read text complete"
    );

    Ok(read_text_body(&text))
}

fn resolve_path(
    state: &AppState,
    query: &ImagePathQuery,
    request_id: &str,
) -> Result<String, ApiErrorResponse> {
    query
        .resolve(state.config.default_image_path.as_deref())
        .map_err(|e| {
            warn!(request_id = %request_id, "Vision request rejected: {}", e);
            ApiErrorResponse::new(e, request_id)
        })
}

async fn analyse_image(state: &AppState, image_path: &str) -> Result<ImageAnalysis, VisionError> {
    let image = read_image(image_path).await?;
    let analysis = state
        .vision_client
        .analyze_image(image, &state.analysis_request())
        .await?;
    log_analysis(&analysis);
    Ok(analysis)
}

/// Log a vision failure once, at the boundary, and convert it
fn vision_failure(request_id: &str, error: VisionError) -> ApiErrorResponse {
    let kind = error.kind();
    let message = error.to_string();
    let api_error = ApiError::from(error);
    let status = api_error.status_code();
    if status >= 500 {
        error!(request_id = %request_id, kind, status, "Vision request failed: {}", message);
    } else {
        warn!(request_id = %request_id, kind, status, "Vision request failed: {}", message);
    }
    ApiErrorResponse::new(api_error, request_id)
}
