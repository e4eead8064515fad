//! API Response types
//!
//! Response structures used by every Rayan API endpoint

use serde::{Deserialize, Serialize};

/// Unified API response structure
///
/// CRUD endpoints answer with this envelope:
/// ```json
/// {
///     "success": true,
///     "message": "Banner created",
///     "data": { ... }
/// }
/// ```
///
/// `success` is required. A body without it is rejected rather than
/// treated as an empty success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application-level success flag
    pub success: bool,
    /// Response data (optional, mutations may omit it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Create a successful envelope with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Create a failed envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Pagination metadata supplied by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Current page number (1-based)
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Total number of items across all pages
    pub total_items: u64,
}

impl PageMetadata {
    /// Build metadata from a page size and a total count
    pub fn new(current_page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(u64::from(limit)) as u32
        };
        Self {
            current_page,
            total_pages,
            total_items,
        }
    }
}

/// List payload
///
/// Paginated endpoints return `{ items, metadata }`, simpler ones return a
/// bare array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListData<T> {
    Paged {
        items: Vec<T>,
        metadata: PageMetadata,
    },
    Plain(Vec<T>),
}

impl<T> ListData<T> {
    /// Split into items and optional metadata
    pub fn into_parts(self) -> (Vec<T>, Option<PageMetadata>) {
        match self {
            ListData::Paged { items, metadata } => (items, Some(metadata)),
            ListData::Plain(items) => (items, None),
        }
    }
}

/// Sort direction accepted by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
