//! HTTP client for the wardrobe API
//!
//! `HttpWardrobeApi` implements `wardrobe_sync::WardrobeApi` against the
//! `/wardrobe/clothing-items` endpoints, so a `WardrobeSession` can drive a
//! remote wardrobe the same way it drives a local store.

pub mod client;
pub mod config;

pub use client::{list_params, HttpWardrobeApi, ITEMS_PATH};
pub use config::{ClientConfig, ConfigError};
