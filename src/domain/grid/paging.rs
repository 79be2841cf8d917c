//! Grid-local state and pagination arithmetic.
//!
//! Derived values (`total_pages`, slice bounds) are always recomputed from
//! the current match count; nothing derived is cached across changes.

use serde::Serialize;

/// Default page size when the caller does not pick one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// The two mutable pieces of grid-local state plus the page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    pub search_term: String,
    /// 1-based, never below 1.
    pub current_page: usize,
    pub items_per_page: usize,
}

impl GridState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            items_per_page,
        }
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

/// `ceil(count / per_page)`, or 0 when there is nothing to paginate.
pub fn total_pages(count: usize, per_page: usize) -> usize {
    if count == 0 || per_page == 0 {
        0
    } else {
        count.div_ceil(per_page)
    }
}

/// Clamps a requested page into `[1, total_pages]`.
///
/// With zero pages the result is 1 so `current_page` stays a valid
/// 1-based value.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// The resolved page and the half-open slice `[start, end)` it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub fn compute(count: usize, per_page: usize, requested_page: usize) -> Self {
        let total_pages = total_pages(count, per_page);
        let page = clamp_page(requested_page, total_pages);
        if total_pages == 0 {
            return Self {
                page,
                total_pages,
                start: 0,
                end: 0,
            };
        }

        let start = ((page - 1) * per_page).min(count);
        let end = (start + per_page).min(count);
        Self {
            page,
            total_pages,
            start,
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}
