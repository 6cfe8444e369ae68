use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use weather_core::{Config, WeatherService};

use crate::{
    render::Renderer,
    routes::{AppState, create_router},
};

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let service = WeatherService::from_config(&config)?;
    let renderer = Renderer::new(config.locale)?;

    if config.credential().is_none() {
        warn!(
            "OPENWEATHER_API_KEY is not configured; weather pages will report it until it is set"
        );
    }

    let app = create_router(AppState::new(service, renderer), &config.server.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        locale = %config.locale,
        time_zone = %config.time_zone,
        "weather app listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
