//! Binary crate for the `weather-web` server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Routing HTTP requests onto `weather-core` page decisions
//! - Rendering the resulting view-models as HTML

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod render;
mod routes;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_web=info,weather_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
