//! # Common API Types
//!
//! This module contains shared types used across multiple API handlers:
//! the paginated response wrapper and the opaque offset cursor helpers.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic paginated response wrapper for list endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// List of items for the current page
    pub data: Vec<T>,
    /// Opaque cursor for fetching the next page (null if this is the last page)
    pub next_cursor: Option<String>,
    /// Convenience field indicating if more pages exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(data: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_more = next_cursor.is_some();
        Self {
            data,
            next_cursor,
            has_more: Some(has_more),
        }
    }

    /// Create a response with no more pages
    pub fn final_page(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
            has_more: Some(false),
        }
    }
}

/// Deserializer distinguishing an absent field from an explicit `null` in
/// partial-update payloads: absent stays `None` (via `#[serde(default)]`),
/// `null` becomes `Some(None)`, and a value becomes `Some(Some(value))`.
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Encode a row offset as an opaque page cursor.
pub fn encode_cursor(offset: u64) -> String {
    URL_SAFE_NO_PAD.encode(format!("o:{}", offset))
}

/// Decode a page cursor back to a row offset. Unknown or malformed cursors
/// yield None and callers should reject them as validation errors.
pub fn decode_cursor(cursor: &str) -> Option<u64> {
    let decoded = URL_SAFE_NO_PAD.decode(cursor).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    text.strip_prefix("o:")?.parse().ok()
}
