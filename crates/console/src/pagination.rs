//! Page position over a server-paged roster.
//!
//! The controller never slices records in memory. Moving to another page
//! means fetching it, and the item total always comes from the server.

/// Records per page on the `/student` resource.
pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    page_size: u32,
    total_items: u64,
    /// Set when the server omitted a total and the last page came back full,
    /// so at least one more page may exist.
    open_ended: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            open_ended: false,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn is_open_ended(&self) -> bool {
        self.open_ended
    }

    /// `ceil(total_items / page_size)`; zero for an empty roster.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest page `go_to_page` will land on.
    pub fn last_page(&self) -> u32 {
        let known = self.total_pages().max(1);
        if self.open_ended {
            known.saturating_add(1)
        } else {
            known
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Move to page `n`, clamped into `[1, last_page]`. Returns whether the
    /// page changed.
    pub fn go_to_page(&mut self, n: u32) -> bool {
        let target = n.clamp(1, self.last_page());
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    /// Filters changed: any earlier page position is stale.
    pub fn filter_changed(&mut self) -> bool {
        self.reset()
    }

    /// Back to page 1. Returns whether the page changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.current_page != 1;
        self.current_page = 1;
        changed
    }

    /// `(offset, limit)` of page `n` in the full roster.
    pub fn window_slice(&self, n: u32) -> (u64, u32) {
        let n = n.max(1);
        (u64::from(n - 1) * u64::from(self.page_size), self.page_size)
    }

    /// Record what the server said about the page just loaded.
    ///
    /// Without a reported total the best knowledge is a lower bound: every
    /// page up to this one, plus this page's records.
    pub fn record_server_total(&mut self, reported: Option<u64>, page_len: usize) {
        match reported {
            Some(total) => {
                self.total_items = total;
                self.open_ended = false;
            }
            None => {
                let (offset, _) = self.window_slice(self.current_page);
                self.total_items = offset + page_len as u64;
                self.open_ended = page_len as u64 >= u64::from(self.page_size);
            }
        }
    }

    /// Pull the current page back inside the known range, e.g. after deletions
    /// shrank the roster. Returns whether the page changed.
    pub fn clamp_to_total(&mut self) -> bool {
        self.go_to_page(self.current_page)
    }

    /// 1-based inclusive item range shown on the current page, or `None` when
    /// the roster is empty.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.total_items == 0 {
            return None;
        }
        let (offset, limit) = self.window_slice(self.current_page);
        let start = offset + 1;
        let end = (offset + u64::from(limit)).min(self.total_items);
        (start <= end).then_some((start, end))
    }
}
