use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::modules::blob::normalize_mime;

/// File category derived from the MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Spreadsheet,
    Document,
    Archive,
    Other,
}

impl FileCategory {
    /// Every category, in display order
    pub const ALL: [FileCategory; 7] = [
        FileCategory::Image,
        FileCategory::Video,
        FileCategory::Audio,
        FileCategory::Spreadsheet,
        FileCategory::Document,
        FileCategory::Archive,
        FileCategory::Other,
    ];

    /// Categorize a MIME type. Rules are checked in order and the first match wins.
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = normalize_mime(mime_type).to_ascii_lowercase();

        if mime.starts_with("image/") {
            FileCategory::Image
        } else if mime.starts_with("video/") {
            FileCategory::Video
        } else if mime.starts_with("audio/") {
            FileCategory::Audio
        } else if contains_any(&mime, &["spreadsheet", "excel", "csv"]) {
            FileCategory::Spreadsheet
        } else if contains_any(&mime, &["document", "pdf", "text", "presentation"]) {
            FileCategory::Document
        } else if contains_any(&mime, &["zip", "x-rar", "x-tar", "x-7z", "gzip"]) {
            FileCategory::Archive
        } else {
            FileCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::Document => "document",
            FileCategory::Archive => "archive",
            FileCategory::Other => "other",
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown file category: {}", s))
    }
}

/// Plural browsing names used by the category pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCollection {
    Documents,
    Images,
    Videos,
    Audio,
    Spreadsheets,
    Archives,
    Others,
    Favorites,
}

impl FileCollection {
    /// Parse a collection name. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "documents" => Some(FileCollection::Documents),
            "images" => Some(FileCollection::Images),
            "videos" => Some(FileCollection::Videos),
            "audio" => Some(FileCollection::Audio),
            "spreadsheets" => Some(FileCollection::Spreadsheets),
            "archives" => Some(FileCollection::Archives),
            "others" => Some(FileCollection::Others),
            "favorites" => Some(FileCollection::Favorites),
            _ => None,
        }
    }

    /// Category selected by this collection, `None` for favorites
    pub fn category(&self) -> Option<FileCategory> {
        match self {
            FileCollection::Documents => Some(FileCategory::Document),
            FileCollection::Images => Some(FileCategory::Image),
            FileCollection::Videos => Some(FileCategory::Video),
            FileCollection::Audio => Some(FileCategory::Audio),
            FileCollection::Spreadsheets => Some(FileCategory::Spreadsheet),
            FileCollection::Archives => Some(FileCategory::Archive),
            FileCollection::Others => Some(FileCategory::Other),
            FileCollection::Favorites => None,
        }
    }
}
