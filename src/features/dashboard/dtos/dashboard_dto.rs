use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::dtos::FileItemDto;
use crate::features::files::models::FileCategory;

// ============================================================================
// Storage
// ============================================================================

/// Storage health bucket derived from the usage percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    /// Below 50%
    Good,
    /// Below 80%
    Moderate,
    Full,
}

/// Usage of one category. Categories without files are left out.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryUsageDto {
    pub category: FileCategory,
    /// Bytes used
    pub size: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StorageUsageDto {
    /// Bytes used by the current user
    pub used: i64,
    /// Quota in bytes
    pub total: i64,
    /// `used / total * 100`, two decimals
    pub percentage: f64,
    pub status: StorageStatus,
    pub by_category: Vec<CategoryUsageDto>,
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CollectionCountsDto {
    pub documents: i64,
    pub images: i64,
    pub videos: i64,
    pub others: i64,
}

/// Dashboard home overview
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total_files: i64,
    pub favorite_count: i64,
    pub collections: CollectionCountsDto,
    /// Most recent uploads, metadata only
    pub recent_files: Vec<FileItemDto>,
    pub storage: StorageUsageDto,
}

// ============================================================================
// Cleanup
// ============================================================================

/// Files worth reviewing to free up space
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CleanupSuggestionsDto {
    /// Files larger than 10MB
    pub large_files: Vec<FileItemDto>,
    /// Files uploaded more than 6 months ago
    pub old_files: Vec<FileItemDto>,
    /// Bytes freed by deleting every suggested file once
    pub reclaimable_bytes: i64,
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportFileDto {
    pub name: String,
    pub size: i64,
    pub category: FileCategory,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportSummaryDto {
    pub total_files: i64,
    pub total_size: i64,
    pub categories: Vec<CategoryUsageDto>,
}

/// Downloadable backup of the user's file metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportDto {
    pub files: Vec<ExportFileDto>,
    pub summary: ExportSummaryDto,
    pub exported_at: DateTime<Utc>,
}

impl ExportDto {
    /// Attachment name, e.g. `zipflow-export-2025-01-31.json`
    pub fn file_name(&self) -> String {
        format!("zipflow-export-{}.json", self.exported_at.format("%Y-%m-%d"))
    }
}
