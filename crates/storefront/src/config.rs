//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_ORIGIN` - Origin of the Web Larek backend (e.g., <https://larek-api.nomoreparties.co>)
//!
//! ## Optional
//! - `LAREK_PRICELESS_POLICY` - `exclude` or `block` (default: exclude)
//! - `LAREK_REQUEST_TIMEOUT_SECS` - HTTP timeout in seconds (default: 30)
//! - `LAREK_RENDER_OUT` - Where the host writes the rendered page (default: dist/index.html)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::model::PricelessPolicy;

/// Path of the catalog/order API below the origin.
const API_PATH: &str = "api/weblarek/";

/// Path of the image CDN below the origin.
const CDN_PATH: &str = "content/weblarek/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct LarekConfig {
    /// Catalog/order API endpoints
    pub api: ApiConfig,
    /// How priceless products affect checkout
    pub priceless_policy: PricelessPolicy,
    /// Where the host binary writes the rendered page
    pub render_out: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Web Larek API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the JSON API (ends with `/`)
    pub base_url: Url,
    /// Base URL product image paths are resolved against (ends with `/`)
    pub cdn_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl LarekConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let priceless_policy = get_env_or_default("LAREK_PRICELESS_POLICY", "exclude")
            .parse::<PricelessPolicy>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LAREK_PRICELESS_POLICY".to_string(), e.to_string())
            })?;
        let render_out = PathBuf::from(get_env_or_default("LAREK_RENDER_OUT", "dist/index.html"));

        Ok(Self {
            api,
            priceless_policy,
            render_out,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let origin = get_required_env("API_ORIGIN")?;
        let timeout_secs = get_env_or_default("LAREK_REQUEST_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LAREK_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Self::from_origin(&origin, Duration::from_secs(timeout_secs))
            .map_err(|e| ConfigError::InvalidEnvVar("API_ORIGIN".to_string(), e.to_string()))
    }

    /// Derive the API and CDN base URLs from the backend origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `origin` is not an absolute URL.
    pub fn from_origin(origin: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        let mut origin = Url::parse(origin)?;
        if !origin.path().ends_with('/') {
            let path = format!("{}/", origin.path());
            origin.set_path(&path);
        }

        Ok(Self {
            base_url: origin.join(API_PATH)?,
            cdn_url: origin.join(CDN_PATH)?,
            timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let raw = get_env_or_default(key, default);
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {raw})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin_derives_endpoints() {
        let api =
            ApiConfig::from_origin("https://larek.example.com", Duration::from_secs(5)).unwrap();
        assert_eq!(
            api.base_url.as_str(),
            "https://larek.example.com/api/weblarek/"
        );
        assert_eq!(
            api.cdn_url.as_str(),
            "https://larek.example.com/content/weblarek/"
        );
        assert_eq!(api.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_origin_keeps_path_prefix() {
        let api = ApiConfig::from_origin("http://127.0.0.1:8080/shop", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            api.base_url.as_str(),
            "http://127.0.0.1:8080/shop/api/weblarek/"
        );
    }

    #[test]
    fn test_from_origin_rejects_relative() {
        assert!(ApiConfig::from_origin("larek.example.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("API_ORIGIN".to_string());
        assert_eq!(err.to_string(), "Missing environment variable: API_ORIGIN");
    }
}
