//! Pagination bookkeeping

use serde::{Deserialize, Serialize};

use wardrobe_domain::FilterCriteria;

/// Cursor over the server-side result set.
///
/// `page` is the last page merged into the collection. `has_more` is derived
/// from the size of the last fetch: a full page means more may exist, a short
/// (or empty) page means the end was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size,
            has_more: false,
        }
    }

    pub fn offset_of(&self, page: usize) -> usize {
        page * self.page_size
    }

    pub fn offset(&self) -> usize {
        self.offset_of(self.page)
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }

    /// Record a completed fetch of `page` that returned `fetched` items.
    pub fn record(&mut self, page: usize, fetched: usize) {
        self.page = page;
        self.has_more = fetched == self.page_size;
    }
}

/// One page fetch, issued by the controller and handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub refresh: bool,
    pub filters: FilterCriteria,
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// Whether the result replaces the collection instead of extending it.
    pub fn replaces(&self) -> bool {
        self.refresh || self.page == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn offsets_follow_page_size() {
        let w = PageWindow::new(20);
        assert_eq!(w.offset_of(0), 0);
        assert_eq!(w.offset_of(3), 60);
        assert_eq!(w.limit(), 20);
    }

    #[rstest]
    #[case(0, 20, true)]
    #[case(1, 19, false)]
    #[case(2, 0, false)]
    #[case(0, 1, false)]
    fn has_more_follows_last_fetch(#[case] page: usize, #[case] fetched: usize, #[case] more: bool) {
        let mut w = PageWindow::new(20);
        w.record(page, fetched);
        assert_eq!(w.has_more, more);
        assert_eq!(w.page, page);
        assert_eq!(w.offset(), page * 20);
    }

    #[rstest]
    #[case(0, false, true)]
    #[case(0, true, true)]
    #[case(3, true, true)]
    #[case(1, false, false)]
    #[case(4, false, false)]
    fn page_zero_and_refresh_replace(#[case] page: usize, #[case] refresh: bool, #[case] replaces: bool) {
        let req = PageRequest {
            page,
            refresh,
            filters: FilterCriteria::new(),
            limit: 20,
            offset: page * 20,
        };
        assert_eq!(req.replaces(), replaces);
    }
}
