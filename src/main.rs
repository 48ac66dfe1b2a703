// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use std::env;
use vision_relay::{
    api::{start_server, AppState},
    config::RelayConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("Starting vision relay...");
    println!("BUILD VERSION: {}", vision_relay::version::get_version_string());
    println!();

    let config = RelayConfig::from_env().context("Invalid vision relay configuration")?;
    tracing::info!(
        endpoint = %config.provider.endpoint,
        listen_addr = %config.listen_addr,
        read_language = %config.read_language,
        "Configuration loaded"
    );
    tracing::debug!("{:?}", config);

    let listen_addr = config.listen_addr;
    let state = AppState::new(config)?;
    start_server(state, listen_addr).await
}
