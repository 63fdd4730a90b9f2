//! Error types for wardrobe-sync

use serde::Serialize;
use thiserror::Error;

use wardrobe_domain::ValidationError;

use crate::api::ApiError;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// A failure of one list operation. Every variant leaves the list as it was
/// before the operation started.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Fetch failed: {0}")]
    Fetch(#[source] ApiError),

    #[error("Update failed: {0}")]
    Update(#[source] ApiError),

    #[error("Delete failed: {0}")]
    Delete(#[source] ApiError),

    #[error("Recording wear failed: {0}")]
    Wear(#[source] ApiError),

    #[error("Create failed: {0}")]
    Create(#[source] ApiError),

    #[error("Adding images failed: {0}")]
    AddImages(#[source] ApiError),

    #[error("Removing images failed: {0}")]
    RemoveImages(#[source] ApiError),

    #[error("Invalid item: {0}")]
    Invalid(#[from] ValidationError),

    /// A page response arrived for a request the controller no longer tracks.
    #[error("Discarded response for page {page}")]
    Stale { page: usize },
}

impl SyncError {
    /// The static message shown to the user for this failure.
    pub fn notice(&self) -> Notice {
        let message = match self {
            SyncError::Fetch(_) | SyncError::Stale { .. } => "Failed to load wardrobe items",
            SyncError::Update(_) => "Failed to update item",
            SyncError::Delete(_) => "Failed to delete item",
            SyncError::Wear(_) => "Failed to mark item as worn",
            SyncError::Create(_) => "Failed to add item",
            SyncError::AddImages(_) => "Failed to upload images",
            SyncError::RemoveImages(_) => "Failed to delete images",
            SyncError::Invalid(_) => "Please check the item details",
        };
        Notice {
            title: "Error",
            message,
        }
    }
}

/// A user-facing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
}
