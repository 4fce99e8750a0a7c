//! Main entry point for the MT validator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;
mod eval;

use cli::commands::Commands;

/// MT Validator - translation quality validation for inference services
#[derive(Parser, Debug)]
#[command(name = "mt-validator", version, about, long_about = None)]
struct Args {
    /// Inference endpoint URL (defaults to INFERENCE_ENDPOINT env var)
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory with the FLORES devtest files
    #[arg(long)]
    dataset_dir: Option<PathBuf>,

    /// Maximum concurrent requests
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let log_level = if std::env::var("RUST_LOG").is_ok() {
        std::env::var("RUST_LOG").unwrap()
    } else {
        "info".to_string()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_PKG_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(endpoint) = args.endpoint {
        std::env::set_var("INFERENCE_ENDPOINT", endpoint);
    }

    if let Some(dataset_dir) = args.dataset_dir {
        std::env::set_var("DATASET_DIR", dataset_dir);
    }

    if let Some(max_concurrent) = args.max_concurrent {
        std::env::set_var("MAX_CONCURRENT", max_concurrent.to_string());
    }

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    // Execute command
    match args.command {
        Some(Commands::Sweep { limit, output }) => {
            cli::commands::handle_sweep(limit, output).await?;
        }
        Some(Commands::Pair {
            src,
            tgt,
            model,
            no_src,
        }) => {
            cli::commands::handle_pair(src, tgt, model, no_src).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
