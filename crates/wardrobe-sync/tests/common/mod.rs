//! In-memory `WardrobeApi` for session tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;

use wardrobe_domain::{Category, FilterCriteria, Item, ItemId, ItemPatch, NewItem};
use wardrobe_sync::{ApiError, WardrobeApi};

pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// `n` items, newest first, named `prefix0`, `prefix1`, ...
pub fn make_items(prefix: &str, n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            Item::new(
                format!("{prefix}{i}"),
                Category::Tops,
                base_time() - Duration::minutes(i as i64),
            )
        })
        .collect()
}

#[derive(Default)]
pub struct FakeApi {
    items: Mutex<Vec<Item>>,
    pub fail_fetch: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_wear: AtomicBool,
    pub fail_images: AtomicBool,
    pub fetch_calls: AtomicUsize,
    /// When set, every fetch waits for a permit before answering.
    pub gate: Option<Arc<Notify>>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn gated(items: Vec<Item>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::with_items(items)
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    fn failing(flag: &AtomicBool) -> Result<(), ApiError> {
        if flag.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            })
        } else {
            Ok(())
        }
    }

    fn modify(&self, id: ItemId, f: impl FnOnce(&mut Item)) -> Result<Item, ApiError> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ApiError::NotFound(id))?;
        f(item);
        Ok(item.clone())
    }
}

#[async_trait]
impl WardrobeApi for FakeApi {
    async fn fetch_items(
        &self,
        filters: &FilterCriteria,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Item>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Self::failing(&self.fail_fetch)?;
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|i| filters.matches(i))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        Self::failing(&self.fail_update)?;
        self.modify(id, |item| patch.apply(item, Utc::now()))
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        Self::failing(&self.fail_delete)?;
        let mut items = self.items.lock().unwrap();
        let pos = items
            .iter()
            .position(|i| i.id == id)
            .ok_or(ApiError::NotFound(id))?;
        items.remove(pos);
        Ok(())
    }

    async fn record_wear(&self, id: ItemId) -> Result<Item, ApiError> {
        Self::failing(&self.fail_wear)?;
        self.modify(id, |item| item.record_wear(Utc::now()))
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item, ApiError> {
        let item = item.clone().into_item(Utc::now());
        self.items.lock().unwrap().insert(0, item.clone());
        Ok(item)
    }

    async fn add_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        Self::failing(&self.fail_images)?;
        let mut result = Ok(());
        let item = self.modify(id, |item| result = item.add_images(urls, Utc::now()))?;
        result.map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok(item)
    }

    async fn remove_images(&self, id: ItemId, urls: &[String]) -> Result<Item, ApiError> {
        Self::failing(&self.fail_images)?;
        let mut removed = 0;
        let item = self.modify(id, |item| removed = item.remove_images(urls, Utc::now()))?;
        if removed == 0 {
            return Err(ApiError::NotFound(id));
        }
        Ok(item)
    }

    async fn get_item(&self, id: ItemId) -> Result<Item, ApiError> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(ApiError::NotFound(id))
    }
}
