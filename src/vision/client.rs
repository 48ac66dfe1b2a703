// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Cloud vision provider client (Computer Vision REST API v3.2)

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::errors::VisionError;
use super::features::AnalysisRequest;
use super::models::{ImageAnalysis, ProviderErrorBody, ReadOperationResult};
use super::operation::ReadJob;

/// API version prefix appended to the endpoint
pub const API_PATH: &[&str] = &["vision", "v3.2"];

/// Header carrying the subscription key
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header carrying the read job location on submission
pub const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status queries for asynchronous read jobs
///
/// This is the only provider call the poller needs, so it is the seam where
/// tests substitute scripted providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadOperations: Send + Sync {
    async fn get_read_result(&self, operation_id: &str)
        -> Result<ReadOperationResult, VisionError>;
}

/// Authenticated client for the vision provider
///
/// Immutable once built and safe to share between concurrent requests.
#[derive(Clone)]
pub struct VisionClient {
    client: Client,
    endpoint: Url,
    subscription_key: String,
}

impl fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("subscription_key", &"<redacted>")
            .finish()
    }
}

impl VisionClient {
    /// Create a new client with the default per-request timeout
    pub fn new(endpoint: &str, subscription_key: &str) -> Result<Self> {
        Self::with_timeout(endpoint, subscription_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a new client with an explicit per-request timeout
    pub fn with_timeout(
        endpoint: &str,
        subscription_key: &str,
        request_timeout: Duration,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| anyhow!("invalid vision endpoint '{}': {}", endpoint, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.cannot_be_a_base() {
            return Err(anyhow!(
                "vision endpoint must be an http(s) URL, got '{}'",
                endpoint
            ));
        }
        if subscription_key.trim().is_empty() {
            return Err(anyhow!("vision subscription key must not be empty"));
        }

        let client = Client::builder().timeout(request_timeout).build()?;

        info!(
            "Vision client configured: endpoint={}, timeout={}s",
            endpoint,
            request_timeout.as_secs()
        );

        Ok(Self {
            client,
            endpoint,
            subscription_key: subscription_key.trim().to_string(),
        })
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Check whether the provider endpoint answers at all
    pub async fn health_check(&self) -> bool {
        match self.client.get(self.endpoint.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Vision provider health check failed: {}", e);
                false
            }
        }
    }

    /// Analyze an image synchronously
    pub async fn analyze_image(
        &self,
        image: Vec<u8>,
        request: &AnalysisRequest,
    ) -> Result<ImageAnalysis, VisionError> {
        let url = self.api_url(&["analyze"]);
        debug!("Vision analyze POST {} ({} bytes)", url, image.len());

        let response = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .query(&request.query_pairs())
            .body(image)
            .send()
            .await?;

        let response = check_status(response).await?;
        decode_json(response).await
    }

    /// Submit an image for asynchronous text recognition
    ///
    /// Returns the job derived from the `Operation-Location` header.
    pub async fn submit_read(&self, image: Vec<u8>, language: &str) -> Result<ReadJob, VisionError> {
        let url = self.api_url(&["read", "analyze"]);
        debug!(
            "Vision read POST {} ({} bytes, language={})",
            url,
            image.len(),
            language
        );

        let response = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .query(&[("language", language)])
            .body(image)
            .send()
            .await?;

        let response = check_status(response).await?;
        let location = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok());

        let job = ReadJob::from_location(location)?;
        info!(
            operation_id = %job.operation_id(),
            "Read job submitted, operation location: {}",
            job.location()
        );
        Ok(job)
    }

    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PATH).extend(segments);
        }
        url
    }
}

#[async_trait]
impl ReadOperations for VisionClient {
    async fn get_read_result(
        &self,
        operation_id: &str,
    ) -> Result<ReadOperationResult, VisionError> {
        let url = self.api_url(&["read", "analyzeResults", operation_id]);
        debug!("Vision read result GET {}", url);

        let response = self
            .client
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .send()
            .await?;

        let response = check_status(response).await?;
        decode_json(response).await
    }
}

/// Turn a non-2xx answer into a `Provider` error, keeping the provider's code
async fn check_status(response: Response) -> Result<Response, VisionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ProviderErrorBody>(&text) {
        Ok(body) => (body.error.code, body.error.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("Unknown").to_string(),
            text,
        ),
    };

    Err(VisionError::Provider {
        status: status.as_u16(),
        code,
        message,
    })
}

async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, VisionError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| VisionError::InvalidResponse(e.to_string()))
}
