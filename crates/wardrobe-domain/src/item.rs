use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{Category, Size};
use crate::validation::{ValidationError, MAX_IMAGES};

/// Globally unique item identifier (UUID v4).
pub type ItemId = Uuid;

/// Color information for a clothing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    #[serde(default)]
    pub hex_code: Option<String>,
}

impl Color {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex_code: None,
        }
    }

    pub fn with_hex(mut self, hex_code: impl Into<String>) -> Self {
        self.hex_code = Some(hex_code.into());
        self
    }
}

/// A single cataloged clothing entry.
///
/// Field names follow the backend's response model so the struct
/// deserializes straight from the list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub wear_count: u32,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a bare item with a fresh id.
    pub fn new(name: impl Into<String>, category: Category, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
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
            is_favorite: false,
            wear_count: 0,
            last_worn: None,
            condition: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Record that the item was worn at `now`.
    pub fn record_wear(&mut self, now: DateTime<Utc>) {
        self.wear_count = self.wear_count.saturating_add(1);
        self.last_worn = Some(now);
        self.updated_at = now;
    }

    /// Append image references. Fails without changes when the item would
    /// hold more than `MAX_IMAGES`.
    pub fn add_images(&mut self, urls: &[String], now: DateTime<Utc>) -> Result<(), ValidationError> {
        if urls.iter().any(|url| url.trim().is_empty()) {
            return Err(ValidationError::Required { field: "image url" });
        }
        if self.image_urls.len() + urls.len() > MAX_IMAGES {
            return Err(ValidationError::TooMany {
                field: "images",
                max: MAX_IMAGES,
            });
        }
        self.image_urls.extend(urls.iter().cloned());
        self.updated_at = now;
        Ok(())
    }

    /// Drop every reference listed in `urls`. Returns how many were removed;
    /// the item is untouched when none matched.
    pub fn remove_images(&mut self, urls: &[String], now: DateTime<Utc>) -> usize {
        let before = self.image_urls.len();
        self.image_urls.retain(|url| !urls.contains(url));
        let removed = before - self.image_urls.len();
        if removed > 0 {
            self.updated_at = now;
        }
        removed
    }

    /// Primary image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn record_wear_increments_and_stamps() {
        let mut item = Item::new("Denim jacket", Category::Outerwear, at(1_000));
        item.record_wear(at(2_000));
        item.record_wear(at(3_000));

        assert_eq!(item.wear_count, 2);
        assert_eq!(item.last_worn, Some(at(3_000)));
        assert_eq!(item.updated_at, at(3_000));
        assert_eq!(item.created_at, at(1_000));
    }

    #[test]
    fn images_are_capped() {
        let mut item = Item::new("Blazer", Category::Outerwear, at(1_000));
        let urls: Vec<String> = (0..9).map(|i| format!("https://img/{i}.jpg")).collect();
        item.add_images(&urls, at(2_000)).unwrap();
        assert_eq!(item.updated_at, at(2_000));

        let two = vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()];
        assert_eq!(
            item.add_images(&two, at(3_000)),
            Err(ValidationError::TooMany {
                field: "images",
                max: MAX_IMAGES
            })
        );
        assert_eq!(item.image_urls.len(), 9);
        assert_eq!(item.updated_at, at(2_000));

        item.add_images(&two[..1], at(4_000)).unwrap();
        assert_eq!(item.image_urls.len(), MAX_IMAGES);
    }

    #[test]
    fn remove_images_reports_matches() {
        let mut item = Item::new("Blazer", Category::Outerwear, at(1_000));
        let urls = vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()];
        item.add_images(&urls, at(1_000)).unwrap();

        assert_eq!(item.remove_images(&["https://img/zzz.jpg".to_string()], at(2_000)), 0);
        assert_eq!(item.updated_at, at(1_000));

        assert_eq!(item.remove_images(&urls[..1], at(3_000)), 1);
        assert_eq!(item.cover_image(), Some("https://img/b.jpg"));
        assert_eq!(item.updated_at, at(3_000));
    }

    #[test]
    fn deserializes_backend_response() {
        let json = r##"{
            "id": "0b6f8a9e-3f1c-4b7e-9a51-5d2f0c8e7a11",
            "user_uid": "user-1",
            "name": "White sneakers",
            "category": "shoes",
            "brand": "Veja",
            "size": "8",
            "colors": [{"name": "White", "hex_code": "#FFFFFF"}],
            "description": null,
            "image_urls": ["https://img.example/1.jpg"],
            "purchase_date": null,
            "purchase_price": 120.0,
            "tags": ["everyday"],
            "is_favorite": true,
            "wear_count": 4,
            "last_worn": "2024-05-01T08:30:00Z",
            "condition": null,
            "notes": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-05-01T08:30:00Z"
        }"##;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.category, Category::Shoes);
        assert_eq!(item.size, Some(Size::Size8));
        assert_eq!(item.colors[0].hex_code.as_deref(), Some("#FFFFFF"));
        assert_eq!(item.cover_image(), Some("https://img.example/1.jpg"));
        assert!(item.is_favorite);
        assert_eq!(item.wear_count, 4);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{
            "id": "0b6f8a9e-3f1c-4b7e-9a51-5d2f0c8e7a11",
            "name": "Scarf",
            "category": "accessories",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.tags.is_empty());
        assert!(!item.is_favorite);
        assert_eq!(item.wear_count, 0);
        assert!(item.last_worn.is_none());
        assert!(item.cover_image().is_none());
    }
}
