// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browse pagination: one record per page, clamped, with an explicit empty state.

/// One rendered browse page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub item: T,
    /// Clamped 0-based index of `item`
    pub index: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total
    }

    /// 1-based position for "page i/N" indicators.
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

/// Result of a browse query.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseResult<T> {
    /// Nothing matches; show the empty-state message.
    Empty,
    Page(Page<T>),
}

impl<T> BrowseResult<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, BrowseResult::Empty)
    }

    pub fn into_page(self) -> Option<Page<T>> {
        match self {
            BrowseResult::Empty => None,
            BrowseResult::Page(page) => Some(page),
        }
    }
}

/// Clamp `page` into `[0, total - 1]`. Returns `None` when `total == 0`.
pub fn clamp_page(page: i64, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    let last = total - 1;
    Some(usize::try_from(page.max(0)).map_or(last, |p| p.min(last)))
}

/// Select the record at `page` from a freshly filtered snapshot.
pub fn paginate<T>(items: Vec<T>, page: i64) -> BrowseResult<T> {
    let total = items.len();
    match clamp_page(page, total) {
        None => BrowseResult::Empty,
        Some(index) => match items.into_iter().nth(index) {
            Some(item) => BrowseResult::Page(Page { item, index, total }),
            None => BrowseResult::Empty,
        },
    }
}
