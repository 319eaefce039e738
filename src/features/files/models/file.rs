use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::files::models::FileCategory;

/// File row without its content column
#[derive(Debug, Clone, FromRow)]
pub struct FileMeta {
    pub id: Uuid,
    pub name: String,
    pub size: i64,
    pub mime_type: String,
    pub user_id: Uuid,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl FileMeta {
    pub fn category(&self) -> FileCategory {
        FileCategory::from_mime(&self.mime_type)
    }
}

impl AsRef<FileMeta> for FileMeta {
    fn as_ref(&self) -> &FileMeta {
        self
    }
}

/// Full file row, including the base64 encoded content
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    #[sqlx(flatten)]
    pub meta: FileMeta,
    pub content: String,
}

impl AsRef<FileMeta> for FileRecord {
    fn as_ref(&self) -> &FileMeta {
        &self.meta
    }
}

/// Values for a file row about to be inserted
#[derive(Debug, Clone)]
pub struct NewFile {
    pub user_id: Uuid,
    pub name: String,
    pub size: i64,
    pub mime_type: String,
    /// Base64 encoded content
    pub content: String,
}
