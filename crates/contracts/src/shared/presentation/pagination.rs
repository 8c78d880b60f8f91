use std::ops::Range;

/// Rows per page in KPI tables.
pub const KPI_TABLE_PAGE_SIZE: usize = 8;

/// Page arithmetic for client-side paged tables. Pages are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub total_rows: usize,
    pub page_size: usize,
}

impl Pager {
    pub fn new(total_rows: usize, page_size: usize) -> Self {
        Self {
            total_rows,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.page_size)
    }

    pub fn last_page(&self) -> usize {
        self.total_pages().saturating_sub(1)
    }

    /// Bring any page index into range.
    pub fn clamp(&self, page: usize) -> usize {
        page.min(self.last_page())
    }

    pub fn has_prev(&self, page: usize) -> bool {
        self.clamp(page) > 0
    }

    pub fn has_next(&self, page: usize) -> bool {
        self.clamp(page) < self.last_page()
    }

    /// Previous page; stays put on the first page.
    pub fn prev(&self, page: usize) -> usize {
        self.clamp(page).saturating_sub(1)
    }

    /// Next page; stays put on the last page.
    pub fn next(&self, page: usize) -> usize {
        self.clamp(self.clamp(page) + 1)
    }

    /// Row indices shown on `page`.
    pub fn window(&self, page: usize) -> Range<usize> {
        let start = (self.clamp(page) * self.page_size).min(self.total_rows);
        let end = (start + self.page_size).min(self.total_rows);
        start..end
    }
}
