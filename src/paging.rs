//! Page number clamping and in-memory pagination

use serde::Serialize;

/// Parses a raw page parameter and clamps it into `[1, max_page]`.
///
/// Missing, non-numeric and zero values all resolve to the first page.
pub fn clamp_page(raw: Option<&str>, max_page: usize) -> usize {
    let max_page = max_page.max(1);
    let page = raw
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    page.min(max_page)
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

pub fn paginate<T: Clone>(items: &[T], raw_page: Option<&str>, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, per_page);
    let page = clamp_page(raw_page, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        page,
        per_page,
        total_items,
        total_pages,
        items,
    }
}
