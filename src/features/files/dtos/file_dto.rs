use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::files::models::{FileCategory, FileMeta, FileRecord};
use crate::features::files::services::catalog::{DateRange, SortDirection, SortField};
use crate::modules::blob;

/// Upload form for OpenAPI documentation.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// A file as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileItemDto {
    pub id: Uuid,
    pub name: String,
    /// Size in bytes
    pub size: i64,
    pub mime_type: String,
    pub category: FileCategory,
    /// `data:` URL with the file content, omitted when listing without content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Same as `url`, for images only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub is_favorite: bool,
}

impl From<FileMeta> for FileItemDto {
    fn from(meta: FileMeta) -> Self {
        let category = meta.category();
        Self {
            id: meta.id,
            name: meta.name,
            size: meta.size,
            mime_type: blob::normalize_mime(&meta.mime_type).to_string(),
            category,
            url: None,
            thumbnail: None,
            created_at: meta.created_at,
            modified_at: meta.created_at,
            is_favorite: meta.is_favorite,
        }
    }
}

impl From<FileRecord> for FileItemDto {
    fn from(record: FileRecord) -> Self {
        let url = blob::data_url(&record.meta.mime_type, &record.content);
        let mut item = FileItemDto::from(record.meta);
        if item.category == FileCategory::Image {
            item.thumbnail = Some(url.clone());
        }
        item.url = Some(url);
        item
    }
}

/// Query params for listing files
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListFilesQuery {
    /// Case-insensitive search in the file name
    pub q: Option<String>,
    /// Collection name: documents, images, videos, audio, spreadsheets, archives, others, favorites
    pub collection: Option<String>,
    /// Comma separated categories, e.g. `image,document`
    pub categories: Option<String>,
    /// Only favorites when true
    pub favorites: Option<bool>,
    /// Minimum size in bytes
    pub min_size: Option<i64>,
    /// Maximum size in bytes
    pub max_size: Option<i64>,
    /// Upload date window (default: all)
    #[serde(default)]
    pub date_range: DateRange,
    /// Sort field (default: created_at)
    #[serde(default)]
    pub sort: SortField,
    /// Sort direction (default: desc)
    #[serde(default)]
    pub direction: SortDirection,
    /// Include `data:` URLs (default: true)
    pub with_content: Option<bool>,
}

/// Query params for deleting a file
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeleteFileQuery {
    /// File ID
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponseDto {
    pub id: Uuid,
    pub is_favorite: bool,
}
