use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder key shipped in sample `.env` files; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub provider: ProviderConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

/// Mock REST backend (json-server)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Third-party recipe API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub page_size: usize,
    pub debounce_ms: u64,
    pub suggestion_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl ProviderConfig {
    /// Whether a usable API key is present
    pub fn is_configured(&self) -> bool {
        matches!(&self.api_key, Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY)
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "1048576".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let backend_timeout = std::env::var("BACKEND_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid BACKEND_TIMEOUT value".to_string()))?;

        let provider_url = std::env::var("SPOONACULAR_BASE_URL")
            .unwrap_or_else(|_| "https://api.spoonacular.com".to_string());

        let api_key = std::env::var("SPOONACULAR_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let cache_ttl_seconds = std::env::var("PROVIDER_CACHE_TTL")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PROVIDER_CACHE_TTL value".to_string()))?;

        let cache_capacity = std::env::var("PROVIDER_CACHE_CAPACITY")
            .unwrap_or_else(|_| "256".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PROVIDER_CACHE_CAPACITY value".to_string()))?;

        let provider_timeout = std::env::var("PROVIDER_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PROVIDER_TIMEOUT value".to_string()))?;

        let page_size = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PAGE_SIZE value".to_string()))?;

        let debounce_ms = std::env::var("SEARCH_DEBOUNCE_MS")
            .unwrap_or_else(|_| "500".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SEARCH_DEBOUNCE_MS value".to_string()))?;

        let storage_path = std::env::var("STORAGE_PATH")
            .unwrap_or_else(|_| "./data/storage.json".to_string())
            .into();

        Ok(Settings {
            server: ServerConfig {
                host,
                port,
                max_request_body_size,
            },
            backend: BackendConfig {
                base_url: backend_url,
                timeout_seconds: backend_timeout,
            },
            provider: ProviderConfig {
                base_url: provider_url,
                api_key,
                cache_ttl_seconds,
                cache_capacity,
                timeout_seconds: provider_timeout,
                user_agent: format!("Recipebox/{}", env!("CARGO_PKG_VERSION")),
            },
            search: SearchConfig {
                page_size,
                debounce_ms,
                suggestion_limit: 5,
            },
            storage: StorageConfig { path: storage_path },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.search.page_size == 0 {
            return Err(Error::Config("Page size must be non-zero".to_string()));
        }

        if self.provider.cache_capacity == 0 {
            return Err(Error::Config(
                "Provider cache capacity must be non-zero".to_string(),
            ));
        }

        url::Url::parse(&self.backend.base_url)
            .map_err(|e| Error::Config(format!("Invalid BACKEND_URL: {e}")))?;
        url::Url::parse(&self.provider.base_url)
            .map_err(|e| Error::Config(format!("Invalid SPOONACULAR_BASE_URL: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_settings(backend_url: &str, provider_url: &str, api_key: Option<&str>) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_request_body_size: 1_048_576,
        },
        backend: BackendConfig {
            base_url: backend_url.to_string(),
            timeout_seconds: 5,
        },
        provider: ProviderConfig {
            base_url: provider_url.to_string(),
            api_key: api_key.map(str::to_string),
            cache_ttl_seconds: 300,
            cache_capacity: 16,
            timeout_seconds: 5,
            user_agent: "test".to_string(),
        },
        search: SearchConfig {
            page_size: 12,
            debounce_ms: 500,
            suggestion_limit: 5,
        },
        storage: StorageConfig {
            path: "/tmp/recipebox-test-storage.json".into(),
        },
    }
}
