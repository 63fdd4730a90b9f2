//! Sort order for the item list

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Field the item list can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    WearCount,
    LastWorn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Sort field plus direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    pub fn reversed(self) -> Self {
        Self::new(self.field, self.direction.reversed())
    }

    /// Compare two items. Items without a value for the field always come
    /// after items with one, whichever the direction.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match (SortKey::of(a, self.field), SortKey::of(b, self.field)) {
            (Some(ka), Some(kb)) => self.direction.apply(ka.cmp(&kb)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Comparable value extracted from an item for one sort field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Time(DateTime<Utc>),
    Text(String),
    Count(u32),
}

impl SortKey {
    pub fn of(item: &Item, field: SortField) -> Option<SortKey> {
        match field {
            SortField::CreatedAt => Some(SortKey::Time(item.created_at)),
            SortField::Name => {
                let name = item.name.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(SortKey::Text(name.to_lowercase()))
                }
            }
            SortField::WearCount => Some(SortKey::Count(item.wear_count)),
            SortField::LastWorn => item.last_worn.map(SortKey::Time),
        }
    }
}
