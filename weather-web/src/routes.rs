//! HTTP surface: page routes, health check, static files and fallbacks.

use std::{path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    handler::HandlerWithoutStateExt,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;
use weather_core::{View, WeatherQuery, WeatherService};

use crate::render::Renderer;

/// Shared, read-only state of every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(service: WeatherService, renderer: Renderer) -> Self {
        Self {
            service: Arc::new(service),
            renderer: Arc::new(renderer),
        }
    }

    /// Turn a view into a page, or a 500 if the template fails.
    fn respond(&self, view: &View) -> Response {
        match self.renderer.render(view) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                error!(error = ?err, "failed to render page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal Server Error",
                        "message": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir).not_found_service(not_found.into_service());

    Router::new()
        .route("/", get(home))
        .route("/weather", get(weather))
        .route("/forecast", get(forecast))
        .route("/api/health", get(health))
        .method_not_allowed_fallback(not_found)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(State(state): State<AppState>) -> Response {
    state.respond(&state.service.home())
}

async fn weather(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let view = state.service.current(&city_query(pairs)).await;
    state.respond(&view)
}

async fn forecast(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let view = state.service.forecast(&city_query(pairs)).await;
    state.respond(&view)
}

/// The first `city` value; a repeated key still gets a page.
fn city_query(pairs: Vec<(String, String)>) -> WeatherQuery {
    pairs
        .into_iter()
        .find(|(key, _)| key == "city")
        .map(|(_, city)| WeatherQuery::new(city))
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": format!("Route {uri} not found"),
        })),
    )
}
