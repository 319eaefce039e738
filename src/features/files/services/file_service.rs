use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FavoriteResponseDto, FileItemDto, ListFilesQuery};
use crate::features::files::models::{FileCategory, FileMeta, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::features::files::services::catalog::{self, FileFilter};
use crate::modules::blob;
use crate::shared::constants::MAX_MIME_TYPE_LEN;
use crate::shared::validation::sanitize_filename;

/// Decoded file content ready to be sent back
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Service for uploading, browsing and managing a user's files
pub struct FileService {
    files: Arc<dyn FileRepository>,
    storage: StorageConfig,
}

impl FileService {
    pub fn new(files: Arc<dyn FileRepository>, storage: StorageConfig) -> Self {
        Self { files, storage }
    }

    pub fn max_upload_size(&self) -> usize {
        self.storage.max_upload_size
    }

    /// Store an uploaded file for the user
    pub async fn upload(
        &self,
        user_id: Uuid,
        file_name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<FileItemDto> {
        if data.len() > self.storage.max_upload_size {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                self.storage.max_upload_size,
                self.storage.max_upload_size / 1024 / 1024
            )));
        }

        let size = i64::try_from(data.len())
            .map_err(|_| AppError::BadRequest("File too large".to_string()))?;

        let mime_type = blob::normalize_mime(mime_type);
        if mime_type.len() > MAX_MIME_TYPE_LEN {
            return Err(AppError::BadRequest(format!(
                "Invalid MIME type: longer than {} characters",
                MAX_MIME_TYPE_LEN
            )));
        }

        // Advisory: concurrent uploads may overshoot the quota slightly
        let used = self.files.total_size(user_id).await?;
        if used.saturating_add(size) > self.storage.quota_bytes {
            return Err(AppError::BadRequest(format!(
                "Storage quota exceeded: {} of {} bytes used",
                used, self.storage.quota_bytes
            )));
        }

        let record = self
            .files
            .insert(NewFile {
                user_id,
                name: sanitize_filename(file_name),
                size,
                mime_type: mime_type.to_string(),
                content: blob::encode(data),
            })
            .await?;

        tracing::info!(
            "File uploaded: id={}, user_id={}, size={}",
            record.meta.id,
            user_id,
            size
        );

        Ok(record.into())
    }

    /// List the user's files, newest first unless another order is requested
    pub async fn list(&self, user_id: Uuid, query: ListFilesQuery) -> Result<Vec<FileItemDto>> {
        let filter = build_filter(&query)?;

        let items = if query.with_content.unwrap_or(true) {
            let records = self.files.list_by_owner(user_id).await?;
            browse(records, &query, &filter)
                .into_iter()
                .map(FileItemDto::from)
                .collect()
        } else {
            let files = self.files.list_meta_by_owner(user_id).await?;
            browse(files, &query, &filter)
                .into_iter()
                .map(FileItemDto::from)
                .collect()
        };

        Ok(items)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<FileItemDto> {
        let record = self
            .files
            .find_owned(id, user_id)
            .await?
            .ok_or_else(file_not_found)?;

        Ok(record.into())
    }

    pub async fn download(&self, user_id: Uuid, id: Uuid) -> Result<DownloadedFile> {
        let record = self
            .files
            .find_owned(id, user_id)
            .await?
            .ok_or_else(file_not_found)?;

        Ok(DownloadedFile {
            bytes: blob::decode(&record.content)?,
            mime_type: blob::normalize_mime(&record.meta.mime_type).to_string(),
            name: record.meta.name,
        })
    }

    /// Delete one of the user's files. `id` comes straight from the query string.
    pub async fn delete(&self, user_id: Uuid, id: Option<&str>) -> Result<()> {
        let raw_id = id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("File ID is required".to_string()))?;

        // An id that cannot exist is reported the same way as a foreign one
        let id = Uuid::parse_str(raw_id).map_err(|_| file_not_found())?;

        if !self.files.delete_owned(id, user_id).await? {
            return Err(file_not_found());
        }

        tracing::info!("File deleted: id={}, user_id={}", id, user_id);
        Ok(())
    }

    pub async fn toggle_favorite(&self, user_id: Uuid, id: Uuid) -> Result<FavoriteResponseDto> {
        let is_favorite = self
            .files
            .toggle_favorite(id, user_id)
            .await?
            .ok_or_else(file_not_found)?;

        Ok(FavoriteResponseDto { id, is_favorite })
    }
}

fn file_not_found() -> AppError {
    AppError::NotFound("File not found or unauthorized".to_string())
}

fn build_filter(query: &ListFilesQuery) -> Result<FileFilter> {
    let categories = match query.categories.as_deref() {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| c.parse::<FileCategory>().map_err(AppError::BadRequest))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    if let (Some(min), Some(max)) = (query.min_size, query.max_size) {
        if min > max {
            return Err(AppError::BadRequest(
                "min_size must not exceed max_size".to_string(),
            ));
        }
    }

    Ok(FileFilter {
        categories,
        favorites_only: query.favorites.unwrap_or(false),
        min_size: query.min_size,
        max_size: query.max_size,
        date_range: query.date_range,
    })
}

fn browse<T: AsRef<FileMeta>>(files: Vec<T>, query: &ListFilesQuery, filter: &FileFilter) -> Vec<T> {
    let files = match query.collection.as_deref() {
        Some(collection) => catalog::files_by_collection(files, collection),
        None => files,
    };
    let files = match query.q.as_deref() {
        Some(q) => catalog::search_files(files, q),
        None => files,
    };

    let mut files = catalog::apply_filter(files, filter, Utc::now());
    catalog::sort_files(&mut files, query.sort, query.direction);
    files
}
