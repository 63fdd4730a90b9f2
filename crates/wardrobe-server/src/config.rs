//! Server configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ServerError;

pub const ENV_ADDR: &str = "WARDROBE_ADDR";
pub const ENV_DB: &str = "WARDROBE_DB";
pub const ENV_LOG: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub addr: String,
    /// SQLite database file; an in-memory database when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            db_path: None,
            log_filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `WARDROBE_ADDR`, `WARDROBE_DB` and `RUST_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(addr) = lookup(ENV_ADDR).filter(|v| !v.trim().is_empty()) {
            config.addr = addr;
        }
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(db));
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        config
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ServerError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        self.addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| ServerError::Config(format!("addr '{}': {}", self.addr, e)))?;
        Ok(())
    }
}
