//! Configuration module for the dashboard.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Gocilla backend API
    pub api_url: Url,
    /// Address to bind the view host to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Match static route segments ignoring ASCII case
    pub case_insensitive_routes: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("GOCILLA_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let api_url = Url::parse(&api_url)
            .map_err(|e| AppError::Config(format!("Invalid GOCILLA_API_URL: {}", e)))?;

        let bind_addr = parse_var("GOCILLA_BIND_ADDR", "127.0.0.1:3000")?;

        let log_level = env::var("GOCILLA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let timeout_secs: u64 = parse_var("GOCILLA_REQUEST_TIMEOUT_SECS", "30")?;

        let case_insensitive_routes = parse_var("GOCILLA_CASE_INSENSITIVE_ROUTES", "false")?;

        Ok(Self {
            api_url,
            bind_addr,
            log_level,
            request_timeout: Duration::from_secs(timeout_secs),
            case_insensitive_routes,
        })
    }
}

fn parse_var<T: FromStr>(key: &str, default: &str) -> Result<T, AppError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| AppError::Config(format!("Invalid {} value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("GOCILLA_API_URL");
        env::remove_var("GOCILLA_BIND_ADDR");
        env::remove_var("GOCILLA_LOG_LEVEL");
        env::remove_var("GOCILLA_REQUEST_TIMEOUT_SECS");
        env::remove_var("GOCILLA_CASE_INSENSITIVE_ROUTES");

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.case_insensitive_routes);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("GOCILLA_TEST_TIMEOUT", "soon");
        let parsed: Result<u64, _> = parse_var("GOCILLA_TEST_TIMEOUT", "30");
        assert!(matches!(parsed, Err(AppError::Config(_))));
        env::remove_var("GOCILLA_TEST_TIMEOUT");
    }
}
