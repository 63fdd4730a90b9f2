//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wardrobe_core::{ItemQuery, StoreError};
use wardrobe_domain::{
    Category, FilterCriteria, Item, ItemId, ItemPatch, NewItem, Size, ValidationError, MAX_IMAGES,
};

use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 100;

/// Query string of the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<Category>,
    pub size: Option<Size>,
    pub brand: Option<String>,
    pub is_favorite: Option<bool>,
    /// Comma-separated
    pub tags: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListParams {
    pub fn into_query(self) -> Result<ItemQuery, ApiError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::Unprocessable(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        let offset = self.offset.unwrap_or(0);
        if i64::try_from(offset).is_err() {
            return Err(ApiError::Unprocessable(format!(
                "offset must be between 0 and {}",
                i64::MAX
            )));
        }

        let filters = FilterCriteria {
            category: self.category,
            size: self.size,
            is_favorite: self.is_favorite,
            brand: self.brand.filter(|b| !b.trim().is_empty()),
            tags: self
                .tags
                .as_deref()
                .map(FilterCriteria::parse_tags)
                .unwrap_or_default(),
        };
        Ok(ItemQuery::page(filters, limit, offset))
    }
}

/// Body of the image endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageUrls {
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

fn parse_id(raw: &str) -> Result<ItemId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::Unprocessable(e.body_text()))
}

/// Service banner
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Wardrobe API is running".to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "wardrobe".to_string(),
    })
}

/// List clothing items, newest first
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    let query = params.into_query()?;
    let items = state
        .store
        .list(&query)
        .map_err(|e| ApiError::from_store(e, "Failed to retrieve clothing items"))?;
    tracing::debug!(count = items.len(), offset = ?query.offset, "Listed clothing items");
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get(id)
        .map_err(|e| ApiError::from_store(e, "Failed to retrieve clothing item"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let new_item = body(payload)?;
    new_item
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let id = state
        .store
        .insert(new_item.into_item(Utc::now()))
        .map_err(|e| ApiError::from_store(e, "Failed to create clothing item"))?;
    // Answer with the stored row so timestamps match later reads.
    let item = state
        .store
        .get(id)
        .map_err(|e| ApiError::from_store(e, "Failed to create clothing item"))?
        .ok_or(ApiError::Internal("Failed to create clothing item"))?;
    tracing::info!(id = %item.id, name = %item.name, "Created clothing item");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let patch = body(payload)?;
    let item = state
        .store
        .update(id, &patch)
        .map_err(|e| ApiError::from_store(e, "Failed to update clothing item"))?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .delete(id)
        .map_err(|e| ApiError::from_store(e, "Failed to delete clothing item"))?;
    tracing::info!(%id, "Deleted clothing item");
    Ok(Json(MessageResponse {
        message: "Clothing item deleted successfully".to_string(),
    }))
}

/// Record that an item was worn today
pub async fn record_wear(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let item = state
        .store
        .record_wear(id)
        .map_err(|e| ApiError::from_store(e, "Failed to record wear"))?;
    Ok(Json(item))
}

/// Attach image references to an item
pub async fn add_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ImageUrls>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let ImageUrls { image_urls } = body(payload)?;
    if image_urls.len() > MAX_IMAGES {
        return Err(too_many_images());
    }
    let item = state.store.add_images(id, &image_urls).map_err(|e| match e {
        StoreError::Validation(ValidationError::TooMany { field: "images", .. }) => {
            too_many_images()
        }
        other => ApiError::from_store(other, "Failed to upload images"),
    })?;
    tracing::info!(%id, count = image_urls.len(), "Added images");
    Ok(Json(item))
}

/// Detach image references from an item
pub async fn remove_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ImageUrls>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id).map_err(|_| ApiError::ImagesNotFound)?;
    let ImageUrls { image_urls } = body(payload)?;
    let item = state
        .store
        .remove_images(id, &image_urls)
        .map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::ImagesNotFound,
            other => ApiError::from_store(other, "Failed to delete images"),
        })?;
    tracing::info!(%id, count = image_urls.len(), "Removed images");
    Ok(Json(item))
}

fn too_many_images() -> ApiError {
    ApiError::BadRequest(format!("Maximum {MAX_IMAGES} images allowed per item"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query.limit, Some(DEFAULT_LIMIT));
        assert_eq!(query.offset, Some(0));
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_list_params_build_filters() {
        let params = ListParams {
            category: Some(Category::Dresses),
            brand: Some("  ".to_string()),
            is_favorite: Some(false),
            tags: Some("summer, ,party".to_string()),
            limit: Some(10),
            offset: Some(30),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.filters.category, Some(Category::Dresses));
        assert!(query.filters.brand.is_none());
        assert_eq!(query.filters.is_favorite, Some(false));
        assert_eq!(query.filters.tags, vec!["summer", "party"]);
        assert_eq!((query.limit, query.offset), (Some(10), Some(30)));
    }

    #[test]
    fn test_list_params_limit_bounds() {
        for limit in [0, MAX_LIMIT + 1] {
            let params = ListParams {
                limit: Some(limit),
                ..Default::default()
            };
            assert!(matches!(params.into_query(), Err(ApiError::Unprocessable(_))));
        }
    }

    #[test]
    fn test_list_params_offset_fits_sqlite() {
        let params = ListParams {
            offset: Some(i64::MAX as usize + 1),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(ApiError::Unprocessable(_))));

        let params = ListParams {
            offset: Some(i64::MAX as usize),
            ..Default::default()
        };
        assert_eq!(params.into_query().unwrap().offset, Some(i64::MAX as usize));
    }
}
