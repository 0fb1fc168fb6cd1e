pub mod api;

use axum::http::Uri;
use axum::routing::{get, post};
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Analysis API (JSON)
        .route("/api/analysis/yearly", post(api::yearly))
        .route("/api/analysis/drilldown", post(api::drilldown))
        .route("/api/analysis/deltas", post(api::deltas))
        .route("/api/analysis/concentration", post(api::concentration))
        .route("/api/analysis/sankey", post(api::sankey))
        // Health check
        .route("/health", get(health))
        .fallback(fallback)
}

async fn health() -> &'static str {
    "OK"
}

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
