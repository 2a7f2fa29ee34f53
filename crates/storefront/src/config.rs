//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PRICELIST_API_URL` - Catalog endpoint (default: the public price-list API)
//! - `PRICELIST_SESSION_DIR` - Directory for session storage (default: `.pricelist/session`)
//! - `PRICELIST_SEARCH_DEBOUNCE_MS` - Search quiet window in ms (default: 300)
//! - `PRICELIST_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL in seconds (default: 300)
//! - `PRICELIST_WHATSAPP_PHONE` - Phone number orders are sent to (default: store number)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default catalog endpoint.
pub const DEFAULT_API_URL: &str = "https://price-list-zbua.onrender.com/api/PriceList";

/// Default phone number receiving orders.
pub const DEFAULT_WHATSAPP_PHONE: &str = "543416860769";

const DEFAULT_SESSION_DIR: &str = ".pricelist/session";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Directory backing session storage
    pub session_dir: PathBuf,
    /// Quiet window for the search debounce
    pub search_debounce: Duration,
    /// Phone number that receives order messages
    pub whatsapp_phone: String,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning `{ "productList": [...] }`
    pub api_url: Url,
    /// How long a fetched catalog is reused
    pub cache_ttl: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            whatsapp_phone: DEFAULT_WHATSAPP_PHONE.to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match lookup("PRICELIST_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => defaults.catalog.api_url,
        };
        let cache_ttl = lookup("PRICELIST_CATALOG_CACHE_TTL_SECS")
            .map(|raw| parse_u64("PRICELIST_CATALOG_CACHE_TTL_SECS", &raw))
            .transpose()?
            .map_or(defaults.catalog.cache_ttl, Duration::from_secs);
        let search_debounce = lookup("PRICELIST_SEARCH_DEBOUNCE_MS")
            .map(|raw| parse_u64("PRICELIST_SEARCH_DEBOUNCE_MS", &raw))
            .transpose()?
            .map_or(defaults.search_debounce, Duration::from_millis);
        let session_dir = lookup("PRICELIST_SESSION_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or(defaults.session_dir, PathBuf::from);
        let whatsapp_phone = match lookup("PRICELIST_WHATSAPP_PHONE") {
            Some(raw) => parse_phone(&raw)?,
            None => defaults.whatsapp_phone,
        };

        Ok(Self {
            catalog: CatalogConfig { api_url, cache_ttl },
            session_dir,
            search_debounce,
            whatsapp_phone,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("PRICELIST_API_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "PRICELIST_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Phone numbers are digits only, in international format without `+`.
fn parse_phone(raw: &str) -> Result<String, ConfigError> {
    let phone = raw.trim().trim_start_matches('+');
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "PRICELIST_WHATSAPP_PHONE".to_string(),
            "must contain digits only".to_string(),
        ));
    }
    Ok(phone.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.catalog.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.session_dir, PathBuf::from(".pricelist/session"));
        assert_eq!(config.whatsapp_phone, DEFAULT_WHATSAPP_PHONE);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PRICELIST_API_URL", "http://localhost:8080/api/PriceList"),
            ("PRICELIST_CATALOG_CACHE_TTL_SECS", "10"),
            ("PRICELIST_SEARCH_DEBOUNCE_MS", "150"),
            ("PRICELIST_SESSION_DIR", "/tmp/pl"),
            ("PRICELIST_WHATSAPP_PHONE", "+5491100000000"),
        ])
        .unwrap();

        assert_eq!(
            config.catalog.api_url.as_str(),
            "http://localhost:8080/api/PriceList"
        );
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.search_debounce, Duration::from_millis(150));
        assert_eq!(config.session_dir, PathBuf::from("/tmp/pl"));
        assert_eq!(config.whatsapp_phone, "5491100000000");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            load(&[("PRICELIST_API_URL", "not a url")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[("PRICELIST_API_URL", "ftp://example.com/list")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = load(&[("PRICELIST_SEARCH_DEBOUNCE_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("PRICELIST_SEARCH_DEBOUNCE_MS"));
        assert!(load(&[("PRICELIST_CATALOG_CACHE_TTL_SECS", "-1")]).is_err());
    }

    #[test]
    fn test_invalid_phone() {
        assert!(load(&[("PRICELIST_WHATSAPP_PHONE", "call me")]).is_err());
        assert!(load(&[("PRICELIST_WHATSAPP_PHONE", "")]).is_err());
    }
}
