use axum::{routing::get, Router};

use crate::handlers;

/// All API routes of the application.
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/kpi", get(handlers::kpi::list_catalog))
        .route(
            "/api/kpi/:kpi_key",
            get(handlers::kpi::get_raw).put(handlers::kpi::put_raw),
        )
        .route(
            "/api/kpi/:kpi_key/normalized",
            get(handlers::kpi::get_normalized),
        )
}
