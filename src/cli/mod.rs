// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Vision relay CLI
#[derive(Parser, Debug)]
#[command(name = "vision-relay-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Run vision provider requests against local images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the full analysis of an image as JSON
    Analyse(commands::ImageArgs),

    /// Report whether an image contains people
    ModelImage(commands::ImageArgs),

    /// Recognise the text in an image
    ReadText(commands::ReadTextArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyse(args) => commands::analyse(args).await,
        Commands::ModelImage(args) => commands::model_image(args).await,
        Commands::ReadText(args) => commands::read_text(args).await,
    }
}
