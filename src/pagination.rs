/// Topics shown per page of the index listing.
pub const PAGE_SIZE: u64 = 5;

/// Normalize the raw `page` query parameter. Absent or unparseable input
/// falls back to page 1, and values below 1 clamp to 1. There is no upper
/// clamp: pages past the end produce an empty listing, not an error.
pub fn requested_page(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1) as u64
}

/// Page-window calculator over a known item total.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total_items: u64,
    per_page: u64,
}

/// One window of a listing plus the navigation metadata around it.
#[derive(Debug, Clone)]
pub struct PageInfo<T> {
    pub number: u64,
    pub items: Vec<T>,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: u64,
    pub next_page_number: u64,
    pub total_pages: u64,
}

impl Paginator {
    pub fn new(total_items: u64) -> Self {
        Paginator {
            total_items,
            per_page: PAGE_SIZE,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.per_page)
    }

    /// Item offset where the given 1-based page starts.
    pub fn offset(&self, number: u64) -> u64 {
        number.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Assemble page metadata around an already-fetched item slice.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> PageInfo<T> {
        let total_pages = self.total_pages();
        let has_previous = number > 1;
        let has_next = number < total_pages;
        PageInfo {
            number,
            items,
            has_previous,
            has_next,
            previous_page_number: if has_previous { number - 1 } else { 1 },
            next_page_number: if has_next { number + 1 } else { total_pages },
            total_pages,
        }
    }
}
