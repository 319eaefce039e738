use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that never belong in a stored file name: control characters
    /// and the reserved set `< > : " | ? *`
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r#"[\x00-\x1f\x7f<>:"|?*]"#).unwrap();

    /// Runs of whitespace, collapsed to a single space
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Maximum stored file name length, matching the `files.name` column
pub const MAX_FILENAME_LEN: usize = 255;

/// Reduce a client supplied file name to something safe to store and echo back.
///
/// Directory components are dropped, unsafe characters removed and
/// whitespace collapsed. Returns `"unnamed"` when nothing usable remains.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "");
    let collapsed = WHITESPACE_RUN.replace_all(cleaned.trim(), " ");
    let trimmed = collapsed.trim_matches('.');

    if trimmed.is_empty() {
        return "unnamed".to_string();
    }

    trimmed.chars().take(MAX_FILENAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("Foto Liburan 2024.jpg"), "Foto Liburan 2024.jpg");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\notes.txt"), "notes.txt");
    }

    #[test]
    fn test_sanitize_removes_unsafe_characters() {
        assert_eq!(sanitize_filename("a<b>c?.txt"), "abc.txt");
        assert_eq!(sanitize_filename("tab\there.txt"), "tabhere.txt");
        assert_eq!(sanitize_filename("  many   spaces .md "), "many spaces .md");
    }

    #[test]
    fn test_sanitize_falls_back_to_unnamed() {
        assert_eq!(sanitize_filename(""), "unnamed");
        assert_eq!(sanitize_filename("..."), "unnamed");
        assert_eq!(sanitize_filename("dir/"), "unnamed");
    }

    #[test]
    fn test_sanitize_truncates_long_names() {
        let long = "x".repeat(400);
        assert_eq!(sanitize_filename(&long).len(), MAX_FILENAME_LEN);
    }
}
