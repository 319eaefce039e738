use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::dashboard::dtos::*;
use crate::features::files::dtos::FileItemDto;
use crate::features::files::models::{FileCategory, FileCollection, FileMeta};
use crate::features::files::repositories::FileRepository;
use crate::features::files::services::catalog;
use crate::shared::constants::{
    LARGE_FILE_THRESHOLD, OLD_FILE_MONTHS, RECENT_FILES_LIMIT, STORAGE_GOOD_BELOW_PERCENT,
    STORAGE_MODERATE_BELOW_PERCENT,
};

/// Service for the per-user storage dashboard
pub struct DashboardService {
    files: Arc<dyn FileRepository>,
    quota_bytes: i64,
}

impl DashboardService {
    pub fn new(files: Arc<dyn FileRepository>, quota_bytes: i64) -> Self {
        Self { files, quota_bytes }
    }

    // ========================================================================
    // Storage
    // ========================================================================

    pub async fn storage_usage(&self, user_id: Uuid) -> Result<StorageUsageDto> {
        let files = self.files.list_meta_by_owner(user_id).await?;
        Ok(storage_usage(&files, self.quota_bytes))
    }

    // ========================================================================
    // Summary
    // ========================================================================

    pub async fn summary(&self, user_id: Uuid) -> Result<DashboardSummaryDto> {
        let files = self.files.list_meta_by_owner(user_id).await?;
        Ok(summary(files, self.quota_bytes))
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    pub async fn cleanup_suggestions(&self, user_id: Uuid) -> Result<CleanupSuggestionsDto> {
        let files = self.files.list_meta_by_owner(user_id).await?;
        Ok(cleanup_suggestions(files, Utc::now()))
    }

    // ========================================================================
    // Export
    // ========================================================================

    pub async fn export(&self, user_id: Uuid) -> Result<ExportDto> {
        let files = self.files.list_meta_by_owner(user_id).await?;
        tracing::info!("Exporting {} file records for user_id={}", files.len(), user_id);
        Ok(export(&files, Utc::now()))
    }
}

fn storage_status(percentage: f64) -> StorageStatus {
    if percentage < STORAGE_GOOD_BELOW_PERCENT {
        StorageStatus::Good
    } else if percentage < STORAGE_MODERATE_BELOW_PERCENT {
        StorageStatus::Moderate
    } else {
        StorageStatus::Full
    }
}

fn usage_by_category(files: &[FileMeta]) -> Vec<CategoryUsageDto> {
    FileCategory::ALL
        .into_iter()
        .map(|category| {
            let (size, count) = files
                .iter()
                .filter(|f| f.category() == category)
                .fold((0i64, 0i64), |(size, count), f| (size + f.size, count + 1));
            CategoryUsageDto {
                category,
                size,
                count,
            }
        })
        .filter(|usage| usage.count > 0)
        .collect()
}

fn storage_usage(files: &[FileMeta], quota_bytes: i64) -> StorageUsageDto {
    let used = catalog::total_size(files);
    let percentage = if quota_bytes > 0 {
        used as f64 / quota_bytes as f64 * 100.0
    } else {
        100.0
    };

    StorageUsageDto {
        used,
        total: quota_bytes,
        percentage: (percentage * 100.0).round() / 100.0,
        status: storage_status(percentage),
        by_category: usage_by_category(files),
    }
}

fn collection_count(files: &[FileMeta], collection: FileCollection) -> i64 {
    files
        .iter()
        .filter(|f| match collection.category() {
            Some(category) => f.category() == category,
            None => f.is_favorite,
        })
        .count() as i64
}

/// `files` must be newest first
fn summary(files: Vec<FileMeta>, quota_bytes: i64) -> DashboardSummaryDto {
    let storage = storage_usage(&files, quota_bytes);
    let collections = CollectionCountsDto {
        documents: collection_count(&files, FileCollection::Documents),
        images: collection_count(&files, FileCollection::Images),
        videos: collection_count(&files, FileCollection::Videos),
        others: collection_count(&files, FileCollection::Others),
    };

    DashboardSummaryDto {
        total_files: files.len() as i64,
        favorite_count: collection_count(&files, FileCollection::Favorites),
        collections,
        storage,
        recent_files: files
            .into_iter()
            .take(RECENT_FILES_LIMIT)
            .map(FileItemDto::from)
            .collect(),
    }
}

fn cleanup_suggestions(files: Vec<FileMeta>, now: DateTime<Utc>) -> CleanupSuggestionsDto {
    let cutoff = now
        .checked_sub_months(Months::new(OLD_FILE_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let (large, old): (Vec<&FileMeta>, Vec<&FileMeta>) = (
        files.iter().filter(|f| f.size > LARGE_FILE_THRESHOLD).collect(),
        files.iter().filter(|f| f.created_at < cutoff).collect(),
    );

    // A file that is both large and old only counts once
    let mut seen = HashSet::new();
    let reclaimable_bytes = large
        .iter()
        .chain(old.iter())
        .filter(|f| seen.insert(f.id))
        .map(|f| f.size)
        .sum();

    CleanupSuggestionsDto {
        large_files: large.into_iter().cloned().map(FileItemDto::from).collect(),
        old_files: old.into_iter().cloned().map(FileItemDto::from).collect(),
        reclaimable_bytes,
    }
}

fn export(files: &[FileMeta], now: DateTime<Utc>) -> ExportDto {
    ExportDto {
        files: files
            .iter()
            .map(|f| ExportFileDto {
                name: f.name.clone(),
                size: f.size,
                category: f.category(),
                created_at: f.created_at,
                is_favorite: f.is_favorite,
            })
            .collect(),
        summary: ExportSummaryDto {
            total_files: files.len() as i64,
            total_size: catalog::total_size(files),
            categories: usage_by_category(files),
        },
        exported_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_file, sample_meta, InMemoryFileRepository};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_storage_status_thresholds() {
        assert_eq!(storage_status(0.0), StorageStatus::Good);
        assert_eq!(storage_status(49.99), StorageStatus::Good);
        assert_eq!(storage_status(50.0), StorageStatus::Moderate);
        assert_eq!(storage_status(79.9), StorageStatus::Moderate);
        assert_eq!(storage_status(80.0), StorageStatus::Full);
        assert_eq!(storage_status(120.0), StorageStatus::Full);
    }

    #[test]
    fn test_storage_usage_sums_sizes_and_omits_empty_categories() {
        let files = vec![
            sample_meta("a.png", "image/png", 300),
            sample_meta("b.jpg", "image/jpeg", 200),
            sample_meta("c.pdf", "application/pdf", 500),
        ];

        let usage = storage_usage(&files, 2_000);

        assert_eq!(usage.used, 1_000);
        assert_eq!(usage.total, 2_000);
        assert_eq!(usage.percentage, 50.0);
        assert_eq!(usage.status, StorageStatus::Moderate);
        assert_eq!(usage.by_category.len(), 2);
        assert_eq!(usage.by_category[0].category, FileCategory::Image);
        assert_eq!(usage.by_category[0].size, 500);
        assert_eq!(usage.by_category[0].count, 2);
        assert_eq!(usage.by_category[1].category, FileCategory::Document);
    }

    #[test]
    fn test_percentage_is_rounded() {
        let files = vec![sample_meta("a.bin", "application/octet-stream", 1)];
        let usage = storage_usage(&files, 3);
        assert_eq!(usage.percentage, 33.33);
        assert_eq!(usage.status, StorageStatus::Good);
    }

    #[test]
    fn test_summary_counts_and_recent() {
        let mut files: Vec<FileMeta> = (0..7)
            .map(|i| sample_meta(&format!("doc-{}.pdf", i), "application/pdf", 10))
            .collect();
        files[0].is_favorite = true;
        files.push(sample_meta("pic.png", "image/png", 10));
        files.push(sample_meta("raw.dat", "application/x-custom", 10));

        let summary = summary(files, 1_000);

        assert_eq!(summary.total_files, 9);
        assert_eq!(summary.favorite_count, 1);
        assert_eq!(summary.collections.documents, 7);
        assert_eq!(summary.collections.images, 1);
        assert_eq!(summary.collections.videos, 0);
        assert_eq!(summary.collections.others, 1);
        assert_eq!(summary.recent_files.len(), RECENT_FILES_LIMIT);
        assert_eq!(summary.recent_files[0].name, "doc-0.pdf");
        assert!(summary.recent_files.iter().all(|f| f.url.is_none()));
        assert_eq!(summary.storage.used, 90);
    }

    #[test]
    fn test_cleanup_suggestions() {
        let now = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap();

        let big = sample_meta("movie.mkv", "video/x-matroska", LARGE_FILE_THRESHOLD + 1);
        let mut old = sample_meta("old.txt", "text/plain", 100);
        old.created_at = now - Duration::days(200);
        let mut old_and_big = sample_meta("backup.zip", "application/zip", LARGE_FILE_THRESHOLD * 2);
        old_and_big.created_at = now - Duration::days(365);
        let mut recent = sample_meta("fresh.txt", "text/plain", 100);
        recent.created_at = now - Duration::days(30);
        let exact = sample_meta("edge.bin", "application/octet-stream", LARGE_FILE_THRESHOLD);

        let suggestions = cleanup_suggestions(vec![big, old, old_and_big, recent, exact], now);

        let large: Vec<_> = suggestions.large_files.iter().map(|f| f.name.as_str()).collect();
        let old: Vec<_> = suggestions.old_files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(large, vec!["movie.mkv", "backup.zip"]);
        assert_eq!(old, vec!["old.txt", "backup.zip"]);
        assert_eq!(
            suggestions.reclaimable_bytes,
            LARGE_FILE_THRESHOLD + 1 + 100 + LARGE_FILE_THRESHOLD * 2
        );
    }

    #[test]
    fn test_export_file_name_and_summary() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 0).unwrap();
        let files = vec![
            sample_meta("a.png", "image/png", 10),
            sample_meta("b.csv", "text/csv", 20),
        ];

        let export = export(&files, now);

        assert_eq!(export.file_name(), "zipflow-export-2025-01-31.json");
        assert_eq!(export.summary.total_files, 2);
        assert_eq!(export.summary.total_size, 30);
        assert_eq!(export.files[1].category, FileCategory::Spreadsheet);
    }

    #[tokio::test]
    async fn test_storage_usage_is_scoped_to_user() {
        let repo = Arc::new(InMemoryFileRepository::default());
        let me = Uuid::now_v7();
        repo.seed(sample_file(me, "mine.pdf", "application/pdf", 700));
        repo.seed(sample_file(me, "mine.png", "image/png", 300));
        repo.seed(sample_file(Uuid::now_v7(), "theirs.pdf", "application/pdf", 5_000));
        let service = DashboardService::new(repo.clone(), 10_000);

        let usage = service.storage_usage(me).await.unwrap();

        assert_eq!(usage.used, 1_000);
        assert_eq!(usage.used, repo.total_size(me).await.unwrap());
        assert_eq!(usage.percentage, 10.0);
        assert_eq!(usage.status, StorageStatus::Good);
    }
}
