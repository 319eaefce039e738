//! Browsing over a user's file list: search, collections, filters and sorting.
//!
//! These are pure functions over anything that exposes [`FileMeta`], so the
//! same code serves listings with and without file content.

use chrono::{DateTime, Duration, Months, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use utoipa::ToSchema;

use crate::features::files::models::{FileCategory, FileCollection, FileMeta};

/// Upload-date window relative to now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    /// Since midnight UTC
    Today,
    /// The last 7 days
    Week,
    /// The last calendar month
    Month,
    /// The last 12 months
    Year,
}

impl DateRange {
    /// Earliest accepted upload time, `None` when unbounded
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateRange::All => None,
            DateRange::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc()),
            DateRange::Week => Some(now - Duration::days(7)),
            DateRange::Month => now.checked_sub_months(Months::new(1)),
            DateRange::Year => now.checked_sub_months(Months::new(12)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Size,
    #[default]
    CreatedAt,
    ModifiedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Combined filter criteria. Empty criteria accept everything.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub categories: Vec<FileCategory>,
    pub favorites_only: bool,
    pub min_size: Option<i64>,
    pub max_size: Option<i64>,
    pub date_range: DateRange,
}

impl FileFilter {
    fn matches(&self, file: &FileMeta, since: Option<DateTime<Utc>>) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&file.category()) {
            return false;
        }
        if self.favorites_only && !file.is_favorite {
            return false;
        }
        if self.min_size.is_some_and(|min| file.size < min) {
            return false;
        }
        if self.max_size.is_some_and(|max| file.size > max) {
            return false;
        }
        match since {
            Some(since) => file.created_at >= since,
            None => true,
        }
    }
}

/// Case-insensitive substring match on the file name. A blank query keeps everything.
pub fn search_files<T: AsRef<FileMeta>>(files: Vec<T>, query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return files;
    }

    files
        .into_iter()
        .filter(|file| file.as_ref().name.to_lowercase().contains(&needle))
        .collect()
}

/// Files belonging to a named collection. Unknown names yield an empty list.
pub fn files_by_collection<T: AsRef<FileMeta>>(files: Vec<T>, collection: &str) -> Vec<T> {
    let Some(collection) = FileCollection::parse(collection) else {
        return Vec::new();
    };

    files
        .into_iter()
        .filter(|file| {
            let meta = file.as_ref();
            match collection.category() {
                Some(category) => meta.category() == category,
                None => meta.is_favorite,
            }
        })
        .collect()
}

pub fn apply_filter<T: AsRef<FileMeta>>(
    files: Vec<T>,
    filter: &FileFilter,
    now: DateTime<Utc>,
) -> Vec<T> {
    let since = filter.date_range.since(now);
    files
        .into_iter()
        .filter(|file| filter.matches(file.as_ref(), since))
        .collect()
}

/// Stable sort; names compare case-insensitively
pub fn sort_files<T: AsRef<FileMeta>>(files: &mut [T], field: SortField, direction: SortDirection) {
    files.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        let ordering = match field {
            SortField::Name => compare_names(&a.name, &b.name),
            SortField::Size => a.size.cmp(&b.size),
            // Files are never modified after upload
            SortField::CreatedAt | SortField::ModifiedAt => a.created_at.cmp(&b.created_at),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn total_size<T: AsRef<FileMeta>>(files: &[T]) -> i64 {
    files.iter().map(|file| file.as_ref().size).sum()
}
