// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::vision::response::people_message;
use crate::config::RelayConfig;
use crate::vision::{
    has_people_category, log_analysis, read_image, AnalysisRequest, ReadPoller, VisionClient,
};

/// Image argument shared by the analysis commands
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Path of the local image
    pub path: String,
}

/// Arguments for read-text command
#[derive(Args, Debug)]
pub struct ReadTextArgs {
    #[command(flatten)]
    pub image: ImageArgs,

    /// Language hint for the read job
    #[arg(long, env = "READ_LANGUAGE")]
    pub language: Option<String>,
}

fn load() -> Result<(RelayConfig, VisionClient)> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let config = RelayConfig::from_env().context("Invalid vision relay configuration")?;
    let client = VisionClient::with_timeout(
        &config.provider.endpoint,
        &config.provider.subscription_key,
        config.provider.request_timeout,
    )?;
    Ok((config, client))
}

/// Print the full analysis as pretty JSON
pub async fn analyse(args: ImageArgs) -> Result<()> {
    let (config, client) = load()?;
    let image = read_image(&args.path).await?;
    let request = AnalysisRequest::standard().with_details(&config.analyze_details);
    let analysis = client.analyze_image(image, &request).await?;
    log_analysis(&analysis);

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Print whether any people category was found
pub async fn model_image(args: ImageArgs) -> Result<()> {
    let (config, client) = load()?;
    let image = read_image(&args.path).await?;
    let request = AnalysisRequest::standard().with_details(&config.analyze_details);
    let analysis = client.analyze_image(image, &request).await?;

    println!("{}", people_message(has_people_category(&analysis)));
    Ok(())
}

/// Submit a read job and print the recognised text once it completes
///
/// Ctrl-C cancels the poll.
pub async fn read_text(args: ReadTextArgs) -> Result<()> {
    let (config, client) = load()?;
    let language = args.language.unwrap_or_else(|| config.read_language.clone());
    let image = read_image(&args.image.path).await?;

    let job = client.submit_read(image, &language).await?;
    info!(operation_id = %job.operation_id(), "Read job submitted");

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling read job");
            ctrl_c_token.cancel();
        }
    });

    let poller = ReadPoller::new(config.poller.clone());
    let text = poller
        .spawn_read_text(Arc::new(client), job, cancel_token)
        .wait()
        .await?;

    println!("{}", text);
    Ok(())
}
