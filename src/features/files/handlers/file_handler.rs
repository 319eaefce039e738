use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppPath, AppQuery};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    DeleteFileQuery, DeleteFileResponseDto, FavoriteResponseDto, FileItemDto, ListFilesQuery,
    UploadFileDto,
};
use crate::features::files::services::FileService;
use crate::shared::types::{ApiResponse, Meta};

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest("File too large".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` field.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileItemDto>),
        (status = 400, description = "No file provided, file too large or quota exceeded"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileItemDto>>)> {
    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field: {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let item = service
        .upload(user.user_id, &file_name, &content_type, &data)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(item),
            Some("File uploaded successfully".to_string()),
            None,
        )),
    ))
}

/// List the current user's files
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Files of the current user", body = ApiResponse<Vec<FileItemDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppQuery(query): AppQuery<ListFilesQuery>,
) -> Result<Json<ApiResponse<Vec<FileItemDto>>>> {
    let files = service.list(user.user_id, query).await?;
    let total = files.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FileItemDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn get_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<FileItemDto>>> {
    let file = service.get(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Download the raw file content
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Raw file content with the stored Content-Type"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn download_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let file = service.download(user.user_id, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.name.replace('"', ""));

    Ok((
        [
            (header::CONTENT_TYPE, file.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}

/// Delete a file
///
/// Only the owner of the file can delete it.
#[utoipa::path(
    delete,
    path = "/api/files",
    tag = "files",
    params(DeleteFileQuery),
    responses(
        (status = 200, description = "File deleted successfully", body = ApiResponse<DeleteFileResponseDto>),
        (status = 400, description = "File ID is required"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppQuery(query): AppQuery<DeleteFileQuery>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    service.delete(user.user_id, query.id.as_deref()).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}

/// Toggle the favorite flag of a file
#[utoipa::path(
    patch,
    path = "/api/files/{id}/favorite",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Favorite flag toggled", body = ApiResponse<FavoriteResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session" = [])
    )
)]
pub async fn toggle_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<FavoriteResponseDto>>> {
    let result = service.toggle_favorite(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
