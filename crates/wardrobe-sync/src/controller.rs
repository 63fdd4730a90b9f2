//! The authoritative item list and its display projection.
//!
//! `ListSyncController` is a plain state machine. Callers ask it for a page
//! request, perform the fetch themselves, and hand the outcome back. The same
//! applies to single-item mutations: the controller only reconciles results
//! the server has already confirmed.
//!
//! Invariants:
//! - the collection never holds two items with the same id
//! - at most one page fetch is in flight
//! - the projection is rebuilt in full after every change

use tracing::{debug, error, info, warn};

use wardrobe_domain::{FilterCriteria, Item, ItemId, SortSpec};

use crate::api::ApiError;
use crate::config::SyncConfig;
use crate::error::{Notice, SyncError};
use crate::projection::project;
use crate::window::{PageRequest, PageWindow};

/// A server-confirmed change to a single item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemMutation {
    /// Replace the entry with the same id.
    Updated(Item),
    /// Remove the entry with this id.
    Removed(ItemId),
}

impl ItemMutation {
    pub fn id(&self) -> ItemId {
        match self {
            ItemMutation::Updated(item) => item.id,
            ItemMutation::Removed(id) => *id,
        }
    }
}

/// Summary of a merged page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLoaded {
    pub page: usize,
    pub fetched: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub struct ListSyncController {
    items: Vec<Item>,
    projected: Vec<Item>,
    window: PageWindow,
    filters: FilterCriteria,
    query: String,
    sort: SortSpec,
    in_flight: Option<PageRequest>,
    refresh_pending: bool,
    notice: Option<Notice>,
}

impl ListSyncController {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            items: Vec::new(),
            projected: Vec::new(),
            window: PageWindow::new(config.page_size),
            filters: FilterCriteria::default(),
            query: String::new(),
            sort: SortSpec::default(),
            in_flight: None,
            refresh_pending: false,
            notice: None,
        }
    }

    // ===== Read side =====

    /// The authoritative collection, in server order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The filtered, sorted view for display.
    pub fn projected(&self) -> &[Item] {
        &self.projected
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn has_more(&self) -> bool {
        self.window.has_more
    }

    /// A page fetch (other than a refresh) is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|r| !r.refresh)
    }

    /// A refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|r| r.refresh)
    }

    pub fn in_flight(&self) -> Option<&PageRequest> {
        self.in_flight.as_ref()
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // ===== Pagination =====

    /// Start fetching `page`. Returns `None` while another fetch is in flight.
    pub fn begin_load(&mut self, page: usize, refresh: bool) -> Option<PageRequest> {
        if let Some(current) = &self.in_flight {
            debug!(
                page,
                in_flight = current.page,
                "Page fetch already in flight, skipping"
            );
            return None;
        }

        let request = PageRequest {
            page,
            refresh,
            filters: self.filters.clone(),
            limit: self.window.limit(),
            offset: self.window.offset_of(page),
        };
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Start fetching the page after the current one, if there is one and
    /// nothing else is in flight.
    pub fn request_next_page(&mut self) -> Option<PageRequest> {
        if !self.window.has_more {
            debug!(page = self.window.page, "No more pages");
            return None;
        }
        if self.in_flight.is_some() {
            return None;
        }
        self.begin_load(self.window.page + 1, false)
    }

    /// Merge the outcome of `request` into the collection.
    ///
    /// A refresh or page 0 replaces the collection; later pages append to it.
    /// On failure the collection is left as it was and a notice is set.
    pub fn finish_load(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Item>, ApiError>,
    ) -> Result<PageLoaded, SyncError> {
        if self.in_flight.as_ref() != Some(request) {
            warn!(page = request.page, "Response for an untracked page request");
            return Err(SyncError::Stale { page: request.page });
        }
        self.in_flight = None;

        if request.filters != self.filters {
            // Filters changed while the fetch was out; its rows no longer apply.
            debug!(page = request.page, "Discarding page fetched with old filters");
            self.refresh_pending = true;
            return Err(SyncError::Stale { page: request.page });
        }

        let fetched = match result {
            Ok(items) => items,
            Err(e) => return Err(self.fail(SyncError::Fetch(e))),
        };
        let count = fetched.len();

        if request.replaces() {
            self.items.clear();
            merge_unique(&mut self.items, fetched);
            self.window.record(0, count);
        } else {
            merge_unique(&mut self.items, fetched);
            self.window.record(request.page, count);
        }
        self.reproject();

        info!(
            page = self.window.page,
            fetched = count,
            total = self.items.len(),
            has_more = self.window.has_more,
            "Loaded wardrobe page"
        );

        Ok(PageLoaded {
            page: self.window.page,
            fetched: count,
            has_more: self.window.has_more,
        })
    }

    /// Change the server-side filters. Returns whether they changed; the
    /// caller is expected to refresh afterwards.
    pub fn set_filters(&mut self, filters: FilterCriteria) -> bool {
        if self.filters == filters {
            return false;
        }
        self.filters = filters;
        true
    }

    /// Whether a fetch was discarded because the filters changed under it.
    pub fn take_refresh_pending(&mut self) -> bool {
        std::mem::take(&mut self.refresh_pending)
    }

    // ===== Projection =====

    /// Set the search query and sort order and rebuild the projection.
    pub fn apply_projection(&mut self, query: &str, sort: SortSpec) {
        self.query = query.to_string();
        self.sort = sort;
        self.reproject();
    }

    pub fn set_query(&mut self, query: &str) {
        self.apply_projection(query, self.sort);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.reproject();
    }

    fn reproject(&mut self) {
        self.projected = project(&self.items, &self.query, &self.sort);
    }

    // ===== Single-item reconciliation =====

    /// Apply a server-confirmed change to one item. Returns whether an entry
    /// changed; an unknown id is ignored.
    pub fn mutate_single(&mut self, mutation: ItemMutation) -> bool {
        let id = mutation.id();
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            debug!(%id, "Mutation for an item not in the list, ignoring");
            return false;
        };

        match mutation {
            ItemMutation::Updated(item) => self.items[pos] = item,
            ItemMutation::Removed(_) => {
                self.items.remove(pos);
            }
        }
        self.reproject();
        true
    }

    /// Put a newly created item at the front of the collection.
    pub fn insert_front(&mut self, item: Item) {
        if let Some(pos) = self.items.iter().position(|i| i.id == item.id) {
            self.items[pos] = item;
        } else {
            self.items.insert(0, item);
        }
        self.reproject();
    }

    // ===== Failures =====

    /// Record a failed operation: log it, set the user notice, and hand the
    /// error back.
    pub fn fail(&mut self, err: SyncError) -> SyncError {
        error!(error = %err, "Wardrobe operation failed");
        self.notice = Some(err.notice());
        err
    }
}

impl Default for ListSyncController {
    fn default() -> Self {
        Self::new(&SyncConfig::default())
    }
}

/// Append `incoming` to `items`, replacing entries whose id is already present.
fn merge_unique(items: &mut Vec<Item>, incoming: Vec<Item>) {
    for item in incoming {
        match items.iter().position(|existing| existing.id == item.id) {
            Some(pos) => {
                debug!(id = %item.id, "Duplicate item in page, keeping latest copy");
                items[pos] = item;
            }
            None => items.push(item),
        }
    }
}
