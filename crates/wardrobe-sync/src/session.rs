//! Drives a `ListSyncController` from `WardrobeApi` calls.
//!
//! Each handler runs one API call and reconciles its outcome into the
//! controller. Handlers return explicit results: the caller always learns
//! whether a load ran, was skipped, or failed. On failure the list keeps its
//! previous contents and the controller carries a notice for display.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info};

use wardrobe_domain::{FilterCriteria, Item, ItemPatch, NewItem, SortSpec};

use crate::api::WardrobeApi;
use crate::config::SyncConfig;
use crate::controller::{ItemMutation, ListSyncController};
use crate::error::{Notice, Result, SyncError};
use crate::window::PageRequest;

/// Outcome of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { fetched: usize, has_more: bool },
    /// Another fetch was in flight, or there was nothing more to load.
    Skipped,
}

/// Everything a list screen needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot {
    pub items: Vec<Item>,
    pub total_loaded: usize,
    pub page: usize,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub has_more: bool,
    pub query: String,
    pub sort: SortSpec,
    pub filters: FilterCriteria,
    pub notice: Option<Notice>,
}

pub struct WardrobeSession<A: WardrobeApi> {
    api: A,
    state: Mutex<ListSyncController>,
}

impl<A: WardrobeApi> WardrobeSession<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, &SyncConfig::default())
    }

    pub fn with_config(api: A, config: &SyncConfig) -> Self {
        Self {
            api,
            state: Mutex::new(ListSyncController::new(config)),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Lock the controller. A poisoned lock still holds consistent state
    /// since every controller method completes before returning.
    fn state(&self) -> MutexGuard<'_, ListSyncController> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the controller.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut ListSyncController) -> R) -> R {
        f(&mut self.state())
    }

    // ===== Loading =====

    /// Reload from the first page, replacing the list.
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.load_page(0, true).await
    }

    pub async fn load_page(&self, page: usize, refresh: bool) -> Result<LoadOutcome> {
        let request = {
            let mut state = self.state();
            state.begin_load(page, refresh)
        };
        match request {
            Some(request) => self.run(request).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Load the page after the current one when the list is idle and the
    /// server may have more.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let request = {
            let mut state = self.state();
            state.request_next_page()
        };
        match request {
            Some(request) => self.run(request).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    async fn run(&self, mut request: PageRequest) -> Result<LoadOutcome> {
        loop {
            let result = self
                .api
                .fetch_items(&request.filters, request.limit, request.offset)
                .await;

            let retry = {
                let mut state = self.state();
                match state.finish_load(&request, result) {
                    Ok(loaded) => {
                        return Ok(LoadOutcome::Loaded {
                            fetched: loaded.fetched,
                            has_more: loaded.has_more,
                        })
                    }
                    Err(SyncError::Stale { .. }) if state.take_refresh_pending() => {
                        state.begin_load(0, true)
                    }
                    Err(e) => return Err(e),
                }
            };

            match retry {
                Some(next) => {
                    debug!("Filters changed during fetch, reloading");
                    request = next;
                }
                None => return Ok(LoadOutcome::Skipped),
            }
        }
    }

    // ===== Single-item operations =====

    pub async fn toggle_favorite(&self, item: &Item) -> Result<Item> {
        let patch = ItemPatch::favorite(!item.is_favorite);
        match self.api.update_item(item.id, &patch).await {
            Ok(updated) => {
                self.state()
                    .mutate_single(ItemMutation::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state().fail(SyncError::Update(e))),
        }
    }

    pub async fn mark_worn(&self, item: &Item) -> Result<Item> {
        match self.api.record_wear(item.id).await {
            Ok(updated) => {
                info!(id = %updated.id, wear_count = updated.wear_count, "Marked item as worn");
                self.state()
                    .mutate_single(ItemMutation::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state().fail(SyncError::Wear(e))),
        }
    }

    pub async fn edit(&self, item: &Item, patch: ItemPatch) -> Result<Item> {
        if let Err(e) = patch.validate() {
            return Err(self.state().fail(SyncError::Invalid(e)));
        }
        if patch.is_empty() {
            return Ok(item.clone());
        }
        match self.api.update_item(item.id, &patch).await {
            Ok(updated) => {
                self.state()
                    .mutate_single(ItemMutation::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state().fail(SyncError::Update(e))),
        }
    }

    pub async fn delete(&self, item: &Item) -> Result<()> {
        match self.api.delete_item(item.id).await {
            Ok(()) => {
                info!(id = %item.id, "Deleted item");
                self.state().mutate_single(ItemMutation::Removed(item.id));
                Ok(())
            }
            Err(e) => Err(self.state().fail(SyncError::Delete(e))),
        }
    }

    /// Attach image references to an item.
    pub async fn add_images(&self, item: &Item, urls: Vec<String>) -> Result<Item> {
        match self.api.add_images(item.id, &urls).await {
            Ok(updated) => {
                info!(id = %updated.id, count = urls.len(), "Added images");
                self.state()
                    .mutate_single(ItemMutation::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state().fail(SyncError::AddImages(e))),
        }
    }

    pub async fn remove_images(&self, item: &Item, urls: Vec<String>) -> Result<Item> {
        match self.api.remove_images(item.id, &urls).await {
            Ok(updated) => {
                self.state()
                    .mutate_single(ItemMutation::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => Err(self.state().fail(SyncError::RemoveImages(e))),
        }
    }

    /// Create an item and put it at the top of the list.
    pub async fn add(&self, item: NewItem) -> Result<Item> {
        if let Err(e) = item.validate() {
            return Err(self.state().fail(SyncError::Invalid(e)));
        }
        match self.api.create_item(&item).await {
            Ok(created) => {
                info!(id = %created.id, name = %created.name, "Added item");
                self.state().insert_front(created.clone());
                Ok(created)
            }
            Err(e) => Err(self.state().fail(SyncError::Create(e))),
        }
    }

    // ===== Projection and filters =====

    pub fn search(&self, query: &str) {
        self.state().set_query(query);
    }

    pub fn sort_by(&self, sort: SortSpec) {
        self.state().set_sort(sort);
    }

    /// Replace the server-side filters and reload from the first page.
    pub async fn apply_filters(&self, filters: FilterCriteria) -> Result<LoadOutcome> {
        let changed = self.state().set_filters(filters);
        if changed {
            debug!("Filters changed");
        }
        self.refresh().await
    }

    // ===== Rendering =====

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state();
        ListSnapshot {
            items: state.projected().to_vec(),
            total_loaded: state.items().len(),
            page: state.window().page,
            is_loading: state.is_loading(),
            is_refreshing: state.is_refreshing(),
            has_more: state.has_more(),
            query: state.query().to_string(),
            sort: state.sort(),
            filters: state.filters().clone(),
            notice: state.notice(),
        }
    }

    /// Take the pending notice, clearing it.
    pub fn dismiss_notice(&self) -> Option<Notice> {
        self.state().take_notice()
    }
}
