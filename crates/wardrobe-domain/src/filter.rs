//! Server-side list constraints.
//!
//! A `FilterCriteria` travels with every list fetch. Absent fields place no
//! constraint on the result; present fields must all match.

use serde::{Deserialize, Serialize};

use crate::category::{Category, Size};
use crate::item::Item;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// `Some(true)` keeps only favorites, `Some(false)` only non-favorites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    /// Case-insensitive substring of the brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Every listed tag must be present on the item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.is_favorite = Some(true);
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether this filter is empty (matches everything).
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.size.is_none()
            && self.is_favorite.is_none()
            && self.brand.as_deref().map_or(true, |b| b.trim().is_empty())
            && self.tags.is_empty()
    }

    /// Reference semantics for in-memory stores.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(size) = self.size {
            if item.size != Some(size) {
                return false;
            }
        }
        if let Some(fav) = self.is_favorite {
            if item.is_favorite != fav {
                return false;
            }
        }
        if let Some(brand) = self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            let needle = brand.to_lowercase();
            match &item.brand {
                Some(b) if b.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        self.tags.iter().all(|t| item.tags.iter().any(|it| it == t))
    }

    /// Tags as the comma-separated list the list endpoint expects.
    pub fn tags_param(&self) -> Option<String> {
        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tags.is_empty() {
            None
        } else {
            Some(tags.join(","))
        }
    }

    /// Parse a comma-separated tag list, dropping blanks.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sneaker() -> Item {
        Item::new("Runner", Category::Shoes, Utc::now())
            .with_brand("New Balance")
            .with_size(Size::Size10)
            .with_tags(["sport", "everyday"])
            .with_favorite(true)
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = FilterCriteria::new();
        assert!(f.is_empty());
        assert!(f.matches(&sneaker()));
    }

    #[test]
    fn blank_brand_counts_as_absent() {
        let f = FilterCriteria::new().brand("  ");
        assert!(f.is_empty());
        assert!(f.matches(&Item::new("Hat", Category::Accessories, Utc::now())));
    }

    #[test]
    fn all_present_fields_must_match() {
        let item = sneaker();
        assert!(FilterCriteria::new()
            .category(Category::Shoes)
            .size(Size::Size10)
            .favorites_only()
            .brand("balance")
            .tag("sport")
            .matches(&item));

        assert!(!FilterCriteria::new().category(Category::Tops).matches(&item));
        assert!(!FilterCriteria::new().size(Size::M).matches(&item));
        assert!(!FilterCriteria::new().brand("nike").matches(&item));
        assert!(!FilterCriteria::new().tag("formal").matches(&item));
    }

    #[test]
    fn brand_filter_excludes_unbranded_items() {
        let item = Item::new("Plain tee", Category::Tops, Utc::now());
        assert!(!FilterCriteria::new().brand("gap").matches(&item));
    }

    #[test]
    fn non_favorite_filter() {
        let mut f = FilterCriteria::new();
        f.is_favorite = Some(false);
        assert!(!f.matches(&sneaker()));
    }

    #[test]
    fn tag_param_round_trip() {
        let f = FilterCriteria::new().tag("a").tag(" ").tag("b");
        assert_eq!(f.tags_param().as_deref(), Some("a,b"));
        assert_eq!(FilterCriteria::parse_tags("a, b,,c "), vec!["a", "b", "c"]);
        assert!(FilterCriteria::new().tags_param().is_none());
    }
}
