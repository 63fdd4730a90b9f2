//! `WardrobeApi` over a local `ItemStore`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use wardrobe_core::{ItemQuery, ItemStore, StoreError};
use wardrobe_domain::{FilterCriteria, Item, ItemId, ItemPatch, NewItem};

use crate::api::{ApiError, WardrobeApi};

/// Serves the wardrobe API straight from a store, without a network hop.
pub struct LocalApi<S: ItemStore> {
    store: Arc<S>,
}

impl<S: ItemStore> LocalApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ItemStore> Clone for LocalApi<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            StoreError::Validation(e) => ApiError::Validation(e.to_string()),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

#[async_trait]
impl<S: ItemStore> WardrobeApi for LocalApi<S> {
    async fn fetch_items(
        &self,
        filters: &FilterCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Item>, ApiError> {
        let query = ItemQuery::page(filters.clone(), limit, offset);
        Ok(self.store.list(&query)?)
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        Ok(self.store.update(id, patch)?)
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        Ok(self.store.delete(id)?)
    }

    async fn record_wear(&self, id: ItemId) -> Result<Item, ApiError> {
        Ok(self.store.record_wear(id)?)
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item, ApiError> {
        item.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let id = self.store.insert(item.clone().into_item(Utc::now()))?;
        // Re-read so the result carries the stored timestamp precision.
        self.store.get(id)?.ok_or(ApiError::NotFound(id))
    }

    async fn get_item(&self, id: ItemId) -> Result<Item, ApiError> {
        self.store.get(id)?.ok_or(ApiError::NotFound(id))
    }

    async fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        Ok(self.store.add_images(id, urls)?)
    }

    async fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        Ok(self.store.remove_images(id, urls)?)
    }
}
