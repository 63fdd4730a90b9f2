//! Wardrobe Server Binary
//!
//! Configured from `WARDROBE_ADDR`, `WARDROBE_DB` and `RUST_LOG`.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wardrobe_server::{serve, AppState, ServerConfig, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    config.validate()?;
    let state = Arc::new(AppState::from_config(&config)?);

    serve(&config.addr, state).await
}
