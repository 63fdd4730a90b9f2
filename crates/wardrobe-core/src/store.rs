use wardrobe_domain::{FilterCriteria, Item, ItemId, ItemPatch, ValidationError};

use crate::query::ItemQuery;

/// The trait that all storage backends implement.
pub trait ItemStore: Send + Sync {
    /// Insert a new item. Returns the item's ID.
    fn insert(&self, item: Item) -> Result<ItemId, StoreError>;

    /// Get an item by ID.
    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// Apply a partial update and return the updated item.
    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError>;

    /// Increment the wear count, stamp last-worn with the current time,
    /// and return the updated item.
    fn record_wear(&self, id: ItemId) -> Result<Item, StoreError>;

    /// Append image references to an item and return the updated item.
    /// Fails with `Validation` when the item would exceed the image limit.
    fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, StoreError>;

    /// Remove image references from an item. `NotFound` when the item is
    /// missing or none of the references were attached.
    fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, StoreError>;

    /// Delete an item by ID.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// Items matching the query's filters, newest first, paginated.
    fn list(&self, q: &ItemQuery) -> Result<Vec<Item>, StoreError>;

    /// Count items matching a filter without fetching them.
    fn count(&self, filters: &FilterCriteria) -> Result<usize, StoreError>;
}

/// Errors from the item store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Item already exists: {0}")]
    AlreadyExists(ItemId),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),
}
