use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create dashboard routes (session required)
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/storage", get(handlers::get_storage))
        .route("/api/dashboard/summary", get(handlers::get_summary))
        .route("/api/dashboard/cleanup", get(handlers::get_cleanup))
        .route("/api/dashboard/export", get(handlers::export_data))
        .with_state(dashboard_service)
}
