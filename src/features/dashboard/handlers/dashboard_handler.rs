use axum::{extract::State, http::header, response::IntoResponse, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

// ============================================================================
// Storage
// ============================================================================

/// Storage usage of the current user
#[utoipa::path(
    get,
    path = "/api/dashboard/storage",
    tag = "dashboard",
    responses(
        (status = 200, description = "Storage usage", body = ApiResponse<StorageUsageDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn get_storage(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<StorageUsageDto>>, AppError> {
    let usage = service.storage_usage(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(usage), None, None)))
}

// ============================================================================
// Summary
// ============================================================================

/// Dashboard overview: counts, recent uploads and storage
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn get_summary(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>, AppError> {
    let summary = service.summary(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

// ============================================================================
// Cleanup
// ============================================================================

/// Large and old files that could be removed
#[utoipa::path(
    get,
    path = "/api/dashboard/cleanup",
    tag = "dashboard",
    responses(
        (status = 200, description = "Cleanup suggestions", body = ApiResponse<CleanupSuggestionsDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn get_cleanup(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<CleanupSuggestionsDto>>, AppError> {
    let suggestions = service.cleanup_suggestions(user.user_id).await?;
    let message = format!(
        "Found {} large files and {} old files",
        suggestions.large_files.len(),
        suggestions.old_files.len()
    );
    Ok(Json(ApiResponse::success(
        Some(suggestions),
        Some(message),
        None,
    )))
}

// ============================================================================
// Export
// ============================================================================

/// Download a JSON backup of the current user's file metadata
#[utoipa::path(
    get,
    path = "/api/dashboard/export",
    tag = "dashboard",
    responses(
        (status = 200, description = "Export file (attachment)", body = ExportDto),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn export_data(
    user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<impl IntoResponse, AppError> {
    let export = service.export(user.user_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name());

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(export)))
}
