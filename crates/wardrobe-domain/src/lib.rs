//! Wardrobe domain types
//!
//! This crate provides the models shared by every layer of the wardrobe app:
//! - Item: a cataloged clothing entry with wear tracking
//! - Category, Size, Color: classification of an item
//! - NewItem, ItemPatch: create and partial-update payloads
//! - FilterCriteria: server-side list constraints
//! - SortSpec: client-side ordering of the item list
//! - Validation: field limits enforced on items and payloads

pub mod category;
pub mod filter;
pub mod item;
pub mod payload;
pub mod sort;
pub mod validation;

pub use category::*;
pub use filter::*;
pub use item::*;
pub use payload::*;
pub use sort::*;
pub use validation::*;
