/// Number of files shown in the dashboard "recent" list
pub const RECENT_FILES_LIMIT: usize = 5;

/// Files above this size are suggested for cleanup (10MB)
pub const LARGE_FILE_THRESHOLD: i64 = 10 * 1024 * 1024;

/// Files older than this many months are suggested for cleanup
pub const OLD_FILE_MONTHS: u32 = 6;

/// Usage percentage below which storage is reported as "good"
pub const STORAGE_GOOD_BELOW_PERCENT: f64 = 50.0;

/// Usage percentage below which storage is reported as "moderate"
pub const STORAGE_MODERATE_BELOW_PERCENT: f64 = 80.0;

/// MIME type assumed when the client sends none
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Longest MIME type accepted on upload
pub const MAX_MIME_TYPE_LEN: usize = 255;
