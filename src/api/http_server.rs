// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{health_handler, version_handler};
use super::vision::{analyse_handler, model_image_handler, read_text_handler};
use crate::config::RelayConfig;
use crate::vision::{AnalysisRequest, ReadPoller, VisionClient};

/// Shared handler state
///
/// Everything here is immutable or internally synchronised, so the state is
/// cloned into every request without locking.
#[derive(Clone)]
pub struct AppState {
    pub vision_client: Arc<VisionClient>,
    pub poller: ReadPoller,
    pub config: Arc<RelayConfig>,
    /// Cancelled on shutdown; every read job polls under a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build the provider client from configuration
    pub fn new(config: RelayConfig) -> Result<Self> {
        let client = VisionClient::with_timeout(
            &config.provider.endpoint,
            &config.provider.subscription_key,
            config.provider.request_timeout,
        )?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    pub fn with_client(vision_client: Arc<VisionClient>, config: RelayConfig) -> Self {
        Self {
            vision_client,
            poller: ReadPoller::new(config.poller.clone()),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    /// Feature set requested by full analyses
    pub fn analysis_request(&self) -> AnalysisRequest {
        AnalysisRequest::standard().with_details(&self.config.analyze_details)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Vision endpoints
        .route("/api/vision/modelImage", post(model_image_handler))
        .route("/api/vision/analyse", post(analyse_handler))
        .route("/api/vision/readtext", post(read_text_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C / SIGTERM, then cancel in-flight read jobs
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let shutdown = state.shutdown.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, cancelling read jobs");
            shutdown.cancel();
        })
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
