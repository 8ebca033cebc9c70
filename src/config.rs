//! Application configuration loaded from environment variables.
//!
//! The TourAPI service key and JWT signing key are required; everything
//! else has a development default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default TourAPI base URL (Korean-language service).
pub const DEFAULT_TOUR_API_BASE_URL: &str = "https://apis.data.go.kr/B551011/KorService1";

/// Where users and bookmarks are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid("STORAGE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- TourAPI ---
    /// TourAPI base URL (without trailing slash)
    pub tour_api_base_url: String,
    /// `MobileOS` parameter sent with every TourAPI request
    pub mobile_os: String,
    /// `MobileApp` parameter sent with every TourAPI request
    pub mobile_app: String,
    /// Maximum attempts per TourAPI call (including the first)
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles per attempt
    pub retry_base_delay: Duration,
    /// Upper bound for a single backoff delay
    pub retry_max_delay: Duration,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,

    // --- Service ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Storage backend for users and bookmarks
    pub storage: StorageBackend,

    // --- Secrets ---
    /// TourAPI service key (decoded form)
    pub tour_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            tour_api_base_url: "http://127.0.0.1:9".to_string(),
            mobile_os: "ETC".to_string(),
            mobile_app: "tourmark".to_string(),
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(10),
            retry_max_delay: Duration::from_millis(50),
            http_timeout: Duration::from_secs(5),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            tour_api_key: "test_service_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            tour_api_base_url: env::var("TOUR_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_TOUR_API_BASE_URL.to_string()),
            mobile_os: env::var("TOUR_MOBILE_OS").unwrap_or_else(|_| "ETC".to_string()),
            mobile_app: env::var("TOUR_MOBILE_APP").unwrap_or_else(|_| "tourmark".to_string()),
            max_attempts: parse_or("TOUR_MAX_ATTEMPTS", 3)?.max(1),
            retry_base_delay: Duration::from_millis(parse_or("TOUR_RETRY_BASE_MS", 1000)?),
            retry_max_delay: Duration::from_millis(parse_or("TOUR_RETRY_MAX_MS", 5000)?),
            http_timeout: Duration::from_secs(parse_or("TOUR_HTTP_TIMEOUT_SECS", 10)?),

            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage: env::var("STORAGE_BACKEND")
                .map(|v| v.parse())
                .unwrap_or(Ok(StorageBackend::Firestore))?,

            tour_api_key: env::var("TOUR_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TOUR_API_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("TOUR_API_KEY", " test_key ");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("STORAGE_BACKEND", "memory");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.tour_api_key, "test_key");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_base_delay, Duration::from_millis(1000));
        assert_eq!(config.retry_max_delay, Duration::from_millis(5000));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(
            "Firestore".parse::<StorageBackend>().unwrap(),
            StorageBackend::Firestore
        );
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
