//! Catalog configuration.
//!
//! Configuration is plain data loaded from RON. Every field has a default, so a
//! config file only needs to name what it overrides:
//!
//! ```ron
//! (
//!     base_url: "http://localhost:8000/api/v2",
//!     max_concurrency: 8,
//! )
//! ```

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Root of the remote API, without a trailing slash.
    pub base_url: String,
    /// Where evolution-node artwork lives; `<id>.png` is appended.
    pub artwork_base_url: String,
    /// Maximum number of species stubs pulled from the list endpoint.
    pub catalog_limit: u32,
    /// `limit` query parameter sent with each list page request.
    pub list_page_size: u32,
    /// Upper bound on concurrent remote calls across all batches.
    pub max_concurrency: usize,
    /// Per-request timeout of the HTTP source; a timed-out call is `Unavailable`.
    pub request_timeout_ms: u64,
    /// `User-Agent` header sent with every HTTP request.
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            artwork_base_url: DEFAULT_ARTWORK_BASE_URL.to_string(),
            catalog_limit: 1000,
            list_page_size: 1000,
            max_concurrency: 32,
            request_timeout_ms: 10_000,
            user_agent: concat!("pokedex-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CatalogConfig {
    /// Parse a RON document; missing fields fall back to their defaults.
    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        let config: CatalogConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a RON config file from disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.catalog_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "catalog_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.list_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "list_page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// First page of the species list endpoint.
    pub fn list_url(&self) -> String {
        let limit = self.list_page_size.min(self.catalog_limit);
        self.endpoint(&format!("pokemon?limit={}", limit))
    }

    pub fn pokemon_url(&self, id: u32) -> String {
        self.endpoint(&format!("pokemon/{}/", id))
    }

    /// Detail endpoint addressed by species name instead of id.
    pub fn pokemon_url_by_name(&self, name: &str) -> String {
        self.endpoint(&format!("pokemon/{}/", name.trim().to_lowercase()))
    }

    pub fn species_url(&self, id: u32) -> String {
        self.endpoint(&format!("pokemon-species/{}/", id))
    }

    pub fn artwork_url(&self, id: u32) -> String {
        format!("{}/{}.png", self.artwork_base_url.trim_end_matches('/'), id)
    }
}
