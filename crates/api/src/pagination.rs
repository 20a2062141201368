// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Page arithmetic for paginated endpoints

/// Fixed page size of the transaction history
pub const HISTORY_PAGE_SIZE: u64 = 50;
/// Holder page size when the caller gives none
pub const DEFAULT_HOLDERS_LIMIT: u64 = 50;
/// Largest holder page size honored
pub const MAX_HOLDERS_LIMIT: u64 = 100;

/// The slice of rows a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number
    pub page: u64,
    /// Rows per page, never zero
    pub limit: u64,
}

impl PageWindow {
    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Summarize this window against the number of matching rows
    pub fn summarize(&self, count: u64) -> PageSummary {
        let total_pages = total_pages(count, self.limit);
        let (current_page, next_page) = if self.page >= total_pages {
            (total_pages, total_pages)
        } else {
            (self.page, self.page + 1)
        };
        PageSummary {
            total_pages,
            current_page,
            next_page,
        }
    }
}

/// Page numbers reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    #[allow(missing_docs)]
    pub total_pages: u64,
    /// The requested page, clamped to `total_pages`
    pub current_page: u64,
    /// The page after `current_page`, clamped to `total_pages`
    pub next_page: u64,
}

/// `count / limit` rounded to the nearest integer, halves away from zero
///
/// Computed as `floor((2 * count + limit) / (2 * limit))`, so the last page
/// is dropped when it holds less than half a page of rows.
pub fn total_pages(count: u64, limit: u64) -> u64 {
    let limit = u128::from(limit.max(1));
    let pages = (2 * u128::from(count) + limit) / (2 * limit);
    u64::try_from(pages).unwrap_or(u64::MAX)
}
