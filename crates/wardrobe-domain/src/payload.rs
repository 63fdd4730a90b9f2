//! Create and partial-update payloads for items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{Category, Size};
use crate::item::{Color, Item};
use crate::validation::{
    check_colors, check_images, check_name, check_opt_len, check_price, check_tags, ValidationError,
    MAX_BRAND_LEN, MAX_DESCRIPTION_LEN, MAX_NOTES_LEN,
};

/// Fields accepted when creating an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            brand: None,
            size: None,
            colors: Vec::new(),
            description: None,
            image_urls: Vec::new(),
            purchase_date: None,
            purchase_price: None,
            tags: Vec::new(),
            condition: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_opt_len("brand", self.brand.as_deref(), MAX_BRAND_LEN)?;
        check_opt_len("description", self.description.as_deref(), MAX_DESCRIPTION_LEN)?;
        check_opt_len("notes", self.notes.as_deref(), MAX_NOTES_LEN)?;
        check_colors(&self.colors)?;
        check_tags(&self.tags)?;
        check_images(&self.image_urls)?;
        check_price(self.purchase_price)
    }

    /// Build the stored item with a fresh id and timestamps.
    pub fn into_item(self, now: DateTime<Utc>) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: self.name,
            category: self.category,
            brand: self.brand,
            size: self.size,
            colors: self.colors,
            description: self.description,
            image_urls: self.image_urls,
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price,
            tags: self.tags,
            is_favorite: false,
            wear_count: 0,
            last_worn: None,
            condition: self.condition,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Color>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItemPatch {
    /// Patch that only sets the favorite flag.
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        check_opt_len("brand", self.brand.as_deref(), MAX_BRAND_LEN)?;
        check_opt_len("description", self.description.as_deref(), MAX_DESCRIPTION_LEN)?;
        check_opt_len("notes", self.notes.as_deref(), MAX_NOTES_LEN)?;
        if let Some(colors) = &self.colors {
            check_colors(colors)?;
        }
        if let Some(tags) = &self.tags {
            check_tags(tags)?;
        }
        check_price(self.purchase_price)
    }

    /// Copy the present fields onto `item` and bump its update time.
    pub fn apply(&self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(brand) = &self.brand {
            item.brand = Some(brand.clone());
        }
        if let Some(size) = self.size {
            item.size = Some(size);
        }
        if let Some(colors) = &self.colors {
            item.colors = colors.clone();
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(date) = self.purchase_date {
            item.purchase_date = Some(date);
        }
        if let Some(price) = self.purchase_price {
            item.purchase_price = Some(price);
        }
        if let Some(tags) = &self.tags {
            item.tags = tags.clone();
        }
        if let Some(fav) = self.is_favorite {
            item.is_favorite = fav;
        }
        if let Some(condition) = &self.condition {
            item.condition = Some(condition.clone());
        }
        if let Some(notes) = &self.notes {
            item.notes = Some(notes.clone());
        }
        item.updated_at = now;
    }
}
