//! List query parameters and client-side pagination state

use std::collections::BTreeMap;

use shared::{PageMetadata, SortOrder};

/// Query sent with a list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Sent as `sortOrder`
    pub sort_order: Option<SortOrder>,
    /// Resource-specific filters (`status`, `keyword`, `categoryId`, ...)
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add pagination
    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Add sort direction
    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Add a filter
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Query-string pairs; blank filter values are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3 + self.filters.len());
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}

/// Pagination as the screen sees it.
///
/// Totals come only from server metadata and are cleared whenever the page
/// size changes, so they never describe a different page size than the one
/// currently requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    total_pages: Option<u32>,
    total_items: Option<u64>,
}

impl PaginationState {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit,
            total_pages: None,
            total_items: None,
        }
    }

    /// Returns `true` when the page changed
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = self.page != page;
        self.page = page;
        changed
    }

    /// Changing the page size resets to page 1 and clears totals.
    /// Returns `true` when the size changed.
    pub fn set_limit(&mut self, limit: u32) -> bool {
        if self.limit == limit {
            return false;
        }
        self.limit = limit;
        self.page = 1;
        self.clear_totals();
        true
    }

    pub fn apply(&mut self, metadata: &PageMetadata) {
        self.total_pages = Some(metadata.total_pages);
        self.total_items = Some(metadata.total_items);
    }

    pub fn clear_totals(&mut self) {
        self.total_pages = None;
        self.total_items = None;
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn total_items(&self) -> Option<u64> {
        self.total_items
    }

    pub fn has_next(&self) -> bool {
        self.total_pages.is_some_and(|total| self.page < total)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
