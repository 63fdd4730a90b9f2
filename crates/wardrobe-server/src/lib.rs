//! Wardrobe Server
//!
//! HTTP API for a single wardrobe's clothing items, backed by the SQLite
//! item store.

pub mod config;
pub mod error;
pub mod http;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use wardrobe_core::{ItemStore, SqliteItemStore};

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};

/// Shared application state
pub struct AppState {
    pub store: Box<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: impl ItemStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// State over a fresh in-memory database
    pub fn in_memory() -> Result<Self, ServerError> {
        Ok(Self::new(SqliteItemStore::open_in_memory()?))
    }

    /// State over the database file at `path`, created if missing
    pub fn open(path: &Path) -> Result<Self, ServerError> {
        let store = SqliteItemStore::open(path)?;
        tracing::info!("Opened wardrobe database at {:?}", path);
        Ok(Self::new(store))
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        match &config.db_path {
            Some(path) => Self::open(path),
            None => {
                tracing::warn!("No database path configured, items will not persist");
                Self::in_memory()
            }
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::root))
        .route("/health", get(http::health))
        // Clothing items
        .route(
            "/wardrobe/clothing-items",
            get(http::list_items).post(http::create_item),
        )
        .route(
            "/wardrobe/clothing-items/{id}",
            get(http::get_item)
                .put(http::update_item)
                .delete(http::delete_item),
        )
        .route(
            "/wardrobe/clothing-items/{id}/images",
            post(http::add_images).delete(http::remove_images),
        )
        .route("/wardrobe/clothing-items/{id}/wear", post(http::record_wear))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already bound listener
pub async fn serve_on(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    let app = create_router(state);
    tracing::info!("Wardrobe server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}
