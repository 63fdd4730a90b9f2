//! Error types for the wardrobe server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use wardrobe_core::StoreError;

/// Startup and configuration failures.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed request, rendered as `{"detail": ...}`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Clothing item not found")]
    NotFound,

    #[error("Clothing item not found or images not found")]
    ImagesNotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::ImagesNotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store failure. Storage errors are logged and replaced by
    /// `failure`, so internals never reach the client.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Validation(e) => ApiError::BadRequest(e.to_string()),
            StoreError::AlreadyExists(id) => ApiError::BadRequest(format!("Item {id} already exists")),
            StoreError::Storage(msg) => {
                tracing::error!(error = %msg, "{}", failure);
                ApiError::Internal(failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wardrobe_domain::ValidationError;

    #[test]
    fn test_store_errors_map_to_status() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            ApiError::from_store(StoreError::NotFound(id), "x").status(),
            StatusCode::NOT_FOUND
        );
        let err = ApiError::from_store(
            StoreError::Validation(ValidationError::Required { field: "name" }),
            "x",
        );
        assert_eq!(err, ApiError::BadRequest("name is required".to_string()));
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = ApiError::from_store(
            StoreError::Storage("disk I/O error".to_string()),
            "Failed to record wear",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to record wear");
    }
}
