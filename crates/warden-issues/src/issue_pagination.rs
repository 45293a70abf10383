pub const ISSUES_PAGE_SIZE: u32 = 100;
pub const EVENTS_PAGE_SIZE: u32 = 30;
pub const COMMENTS_PAGE_SIZE: u32 = 100;

/// Forward-only cursor over a 1-based paginated listing.
///
/// The listing is exhausted by the first empty page; page length is never
/// compared against the requested page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    next_page: u32,
    exhausted: bool,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            next_page: 1,
            exhausted: false,
        }
    }

    /// Page number to request next, or `None` once an empty page was seen.
    pub fn next_page(&self) -> Option<u32> {
        if self.exhausted {
            None
        } else {
            Some(self.next_page)
        }
    }

    /// Record the length of the page just fetched.
    pub fn advance(&mut self, page_len: usize) {
        if page_len == 0 {
            self.exhausted = true;
        } else {
            self.next_page = self.next_page.saturating_add(1);
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}
