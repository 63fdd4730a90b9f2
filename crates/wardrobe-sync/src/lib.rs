//! Wardrobe list synchronization
//!
//! Keeps the app's item list in step with the wardrobe API:
//! - `ListSyncController` owns the authoritative collection, the page window,
//!   and the filtered/sorted projection shown to the user. It does no I/O.
//! - `WardrobeApi` is the seam to whatever serves items (HTTP client, local store).
//! - `WardrobeSession` drives the controller from API calls and returns
//!   explicit outcomes for every handler.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod local;
pub mod projection;
pub mod session;
pub mod window;

pub use api::{ApiError, WardrobeApi};
pub use config::{ConfigError, SyncConfig};
pub use controller::{ItemMutation, ListSyncController, PageLoaded};
pub use error::{Notice, SyncError};
pub use local::LocalApi;
pub use projection::{matches_query, project};
pub use session::{ListSnapshot, LoadOutcome, WardrobeSession};
pub use window::{PageRequest, PageWindow};
