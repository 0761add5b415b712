//! Page-of-results container.

use serde::Serialize;

/// One page of an ordered result set plus the paging totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    items: Vec<T>,
    page_number: u32,
    page_size: u32,
    total_pages: u64,
    total_count: u64,
    has_previous_page: bool,
    has_next_page: bool,
}

impl<T> PaginatedList<T> {
    /// Builds a page. `page_number` and `page_size` are 1-based and are
    /// clamped to at least 1.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, page_number: u32, page_size: u32) -> Self {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(u64::from(page_size));
        Self {
            items,
            page_number,
            page_size,
            total_pages,
            total_count,
            has_previous_page: page_number > 1,
            has_next_page: u64::from(page_number) < total_pages,
        }
    }

    /// Number of rows to skip to reach `page_number`.
    #[must_use]
    pub fn offset(page_number: u32, page_size: u32) -> u64 {
        u64::from(page_number.saturating_sub(1)) * u64::from(page_size)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 1-based page number.
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Requested page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `ceil(total_count / page_size)`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Number of rows across all pages.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Projects every item, keeping the paging totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_count: self.total_count,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}
