// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// What discovery does when the places provider cannot supply real data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Replace failures and empty results with synthetic listings
    Mask,
    /// Return provider failures to the caller
    Surface,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mask" => Ok(FallbackPolicy::Mask),
            "surface" => Ok(FallbackPolicy::Surface),
            other => Err(format!("unknown fallback policy: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// HERE Discover API key
    pub here_api_key: String,

    /// Base URL of the HERE search API (without the /discover path)
    pub here_base_url: String,

    /// Maximum results requested per discovery
    pub result_limit: u32,

    /// Number of synthetic listings produced on fallback
    pub fallback_count: usize,

    pub fallback_policy: FallbackPolicy,

    /// Coordinates used when the client reports none
    pub default_latitude: f64,
    pub default_longitude: f64,

    /// Outbound HTTP timeout in seconds
    pub http_timeout_secs: u64,

    /// TTL for cached raw provider items
    pub cache_ttl_secs: u64,

    pub cache_cleanup_interval_secs: u64,

    /// Outbound requests allowed per second
    pub outbound_rate_per_sec: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 8003,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            here_api_key: String::new(),
            here_base_url: "https://discover.search.hereapi.com/v1".to_string(),
            result_limit: 20,
            fallback_count: 5,
            fallback_policy: FallbackPolicy::Mask,
            default_latitude: 40.7128,
            default_longitude: -74.0060,
            http_timeout_secs: 10,
            cache_ttl_secs: 300,
            cache_cleanup_interval_secs: 60,
            outbound_rate_per_sec: 5,
        }
    }
}

/// Read a variable and parse it, keeping the default on absence or parse failure
fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            server_port: parsed_var("SERVER_PORT", defaults.server_port),
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            here_api_key: env::var("HERE_API_KEY").unwrap_or_default(),
            here_base_url: env::var("HERE_BASE_URL").unwrap_or(defaults.here_base_url),
            result_limit: parsed_var("DISCOVER_RESULT_LIMIT", defaults.result_limit),
            fallback_count: parsed_var("FALLBACK_COUNT", defaults.fallback_count),
            fallback_policy: parsed_var("FALLBACK_POLICY", defaults.fallback_policy),
            default_latitude: parsed_var("DEFAULT_LATITUDE", defaults.default_latitude),
            default_longitude: parsed_var("DEFAULT_LONGITUDE", defaults.default_longitude),
            http_timeout_secs: parsed_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            cache_ttl_secs: parsed_var("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_cleanup_interval_secs: parsed_var(
                "CACHE_CLEANUP_INTERVAL_SECS",
                defaults.cache_cleanup_interval_secs,
            ),
            outbound_rate_per_sec: parsed_var(
                "OUTBOUND_RATE_PER_SEC",
                defaults.outbound_rate_per_sec,
            ),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.result_limit == 0 {
            return Err("DISCOVER_RESULT_LIMIT must be greater than zero".to_string());
        }

        if self.fallback_count == 0 {
            return Err("FALLBACK_COUNT must be greater than zero".to_string());
        }

        if self.http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than zero".to_string());
        }

        if !(-90.0..=90.0).contains(&self.default_latitude)
            || !(-180.0..=180.0).contains(&self.default_longitude)
        {
            return Err(format!(
                "Default coordinates out of range: {}, {}",
                self.default_latitude, self.default_longitude
            ));
        }

        if self.here_api_key.is_empty() {
            log::warn!("HERE_API_KEY not configured - discovery will rely on fallback data");
        }

        Ok(())
    }
}
