use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{FileMeta, FileRecord, NewFile};

/// Persistence for uploaded files. Every query is scoped to the owning user.
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert(&self, new_file: NewFile) -> Result<FileRecord>;

    /// All files of a user including content, newest first
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<FileRecord>>;

    /// All files of a user without content, newest first
    async fn list_meta_by_owner(&self, user_id: Uuid) -> Result<Vec<FileMeta>>;

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<FileRecord>>;

    /// Returns `false` when no file with this id belongs to the user
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Flip the favorite flag and return the new value, `None` when not owned
    async fn toggle_favorite(&self, id: Uuid, user_id: Uuid) -> Result<Option<bool>>;

    /// Sum of sizes of the user's files in bytes
    async fn total_size(&self, user_id: Uuid) -> Result<i64>;
}

/// PostgreSQL-backed file repository
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn insert(&self, new_file: NewFile) -> Result<FileRecord> {
        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (id, name, size, mime_type, content, user_id, is_favorite, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            RETURNING id, name, size, mime_type, content, user_id, is_favorite, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&new_file.name)
        .bind(new_file.size)
        .bind(&new_file.mime_type)
        .bind(&new_file.content)
        .bind(new_file.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, name, size, mime_type, content, user_id, is_favorite, created_at
            FROM files
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_meta_by_owner(&self, user_id: Uuid) -> Result<Vec<FileMeta>> {
        let files = sqlx::query_as::<_, FileMeta>(
            r#"
            SELECT id, name, size, mime_type, user_id, is_favorite, created_at
            FROM files
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, name, size, mime_type, content, user_id, is_favorite, created_at
            FROM files
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_favorite(&self, id: Uuid, user_id: Uuid) -> Result<Option<bool>> {
        let flag = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE files
            SET is_favorite = NOT is_favorite
            WHERE id = $1 AND user_id = $2
            RETURNING is_favorite
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flag)
    }

    async fn total_size(&self, user_id: Uuid) -> Result<i64> {
        // SUM over BIGINT yields NUMERIC in Postgres, cast back
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(size), 0)::BIGINT FROM files WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
