use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers;
use crate::features::files::services::FileService;

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create routes for the files feature
pub fn routes(service: Arc<FileService>) -> Router {
    let upload_limit = service.max_upload_size().saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/api/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/files",
            get(handlers::list_files).delete(handlers::delete_file),
        )
        .route("/api/files/{id}", get(handlers::get_file))
        .route("/api/files/{id}/download", get(handlers::download_file))
        .route("/api/files/{id}/favorite", patch(handlers::toggle_favorite))
        .with_state(service)
}
