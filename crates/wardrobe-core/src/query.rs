use serde::{Deserialize, Serialize};

use wardrobe_domain::FilterCriteria;

/// A page of items matching a filter.
///
/// Results are always ordered newest first; `limit`/`offset` describe the
/// page window over that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub filters: FilterCriteria,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ItemQuery {
    pub fn new(filters: FilterCriteria) -> Self {
        Self {
            filters,
            limit: None,
            offset: None,
        }
    }

    pub fn page(filters: FilterCriteria, limit: usize, offset: usize) -> Self {
        Self {
            filters,
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wardrobe_domain::Category;

    #[test]
    fn default_query_is_unbounded() {
        let q = ItemQuery::default();
        assert!(q.filters.is_empty());
        assert!(q.limit.is_none());
        assert!(q.offset.is_none());
    }

    #[test]
    fn page_query_carries_window() {
        let q = ItemQuery::page(FilterCriteria::new().category(Category::Shoes), 20, 40);
        assert_eq!(q.limit, Some(20));
        assert_eq!(q.offset, Some(40));
        assert_eq!(q.filters.category, Some(Category::Shoes));
    }
}
