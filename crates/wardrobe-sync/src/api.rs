//! The wardrobe API seam.
//!
//! Anything that can list and mutate items implements `WardrobeApi`: the HTTP
//! client in `wardrobe-client`, or `LocalApi` over an `ItemStore`.

use async_trait::async_trait;

use wardrobe_domain::{FilterCriteria, Item, ItemId, ItemPatch, NewItem};

#[async_trait]
pub trait WardrobeApi: Send + Sync {
    /// Up to `limit` items starting at `offset`, in the server's default order.
    /// A short or empty result signals the end of the data.
    async fn fetch_items(
        &self,
        filters: &FilterCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Item>, ApiError>;

    /// Apply a partial update and return the full updated item.
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError>;

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError>;

    /// Increment the wear count and set last-worn to now.
    async fn record_wear(&self, id: ItemId) -> Result<Item, ApiError>;

    async fn create_item(&self, item: &NewItem) -> Result<Item, ApiError>;

    async fn get_item(&self, id: ItemId) -> Result<Item, ApiError>;

    /// Attach image references and return the updated item.
    async fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError>;

    /// Detach image references and return the updated item.
    async fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError>;
}

#[async_trait]
impl<T: WardrobeApi + ?Sized> WardrobeApi for std::sync::Arc<T> {
    async fn fetch_items(
        &self,
        filters: &FilterCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Item>, ApiError> {
        (**self).fetch_items(filters, limit, offset).await
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        (**self).update_item(id, patch).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        (**self).delete_item(id).await
    }

    async fn record_wear(&self, id: ItemId) -> Result<Item, ApiError> {
        (**self).record_wear(id).await
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item, ApiError> {
        (**self).create_item(item).await
    }

    async fn get_item(&self, id: ItemId) -> Result<Item, ApiError> {
        (**self).get_item(id).await
    }

    async fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        (**self).add_images(id, urls).await
    }

    async fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        (**self).remove_images(id, urls).await
    }
}

/// Errors from an API call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
