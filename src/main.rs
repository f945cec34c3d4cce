use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod cli;
mod config;
mod error;
mod handlers;
mod helpers;
mod openapi_tests;
mod router;
mod schemas;

use cli::Cli;

/// Main entry point for the ShopRust application.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shoprust=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // .env feeds the clap arguments that default from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.run().await
}
