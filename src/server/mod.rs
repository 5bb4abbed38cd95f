//! JSON API over the catalog plus the background refresh controls.
//!
//! - `GET /health`
//! - `GET /api/search?q=` - builds using an item, in any supported language
//! - `GET /api/builds`, `GET /api/build?url=`
//! - `GET /api/tier-list`
//! - `POST /api/refresh?mode=full|equipment` - 202, or 409 while a refresh runs
//! - `GET /api/refresh/status`, `GET /api/refresh/events` (server-sent events)

mod handlers;

use crate::error::{GearError, Result};
use crate::services::{CatalogService, JobManager, RefreshService};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub refresh: Arc<RefreshService>,
    pub jobs: Arc<JobManager>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/search", get(handlers::search))
        .route("/api/builds", get(handlers::builds))
        .route("/api/build", get(handlers::build))
        .route("/api/tier-list", get(handlers::tier_list))
        .route("/api/refresh", post(handlers::start_refresh))
        .route("/api/refresh/status", get(handlers::refresh_status))
        .route("/api/refresh/events", get(handlers::refresh_events))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub struct ApiError(GearError);

impl From<GearError> for ApiError {
    fn from(e: GearError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GearError::Conflict(_) => StatusCode::CONFLICT,
            GearError::NotFound(_) => StatusCode::NOT_FOUND,
            other => {
                error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
