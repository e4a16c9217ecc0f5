// ── Pagination ──
//
// 1-based pages over an already filtered list. Out-of-range requests
// clamp to the nearest valid page instead of rendering an empty table.

use serde::Serialize;

/// Rows per page in the node table.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown (after clamping).
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    /// `0` when the list is empty.
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into page `page` of `per_page` rows.
///
/// `per_page` of zero is treated as one.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}
