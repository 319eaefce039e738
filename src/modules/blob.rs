//! Blob codec for file content stored in the database
//!
//! File bodies live in a TEXT column as standard base64. This module owns the
//! encoding in both directions and builds the `data:` URLs handed to clients.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::core::error::AppError;
use crate::shared::constants::DEFAULT_MIME_TYPE;

/// Encode raw bytes for storage
pub fn encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode stored content back into raw bytes
pub fn decode(content: &str) -> Result<Vec<u8>, AppError> {
    BASE64
        .decode(content.trim())
        .map_err(|e| AppError::Internal(format!("Stored file content is not valid base64: {}", e)))
}

/// Build a `data:` URL from a MIME type and already-encoded content
pub fn data_url(mime_type: &str, content: &str) -> String {
    format!("data:{};base64,{}", normalize_mime(mime_type), content)
}

/// Fall back to `application/octet-stream` for a missing MIME type
pub fn normalize_mime(mime_type: &str) -> &str {
    let trimmed = mime_type.trim();
    if trimmed.is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        trimmed
    }
}
