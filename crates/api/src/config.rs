//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default `"0.0.0.0"`)
/// - `PORT`: listen port (default `8080`)
/// - `RUST_LOG`: tracing filter directive (default `"info"`)
/// - `PAYMENT_SERVICE_URL`: base URL of the payment service
/// - `INVENTORY_SERVICE_URL`: base URL of the inventory service
/// - `REMOTE_CALL_TIMEOUT_MS`: bound on every remote call (default `5000`)
/// - `DATABASE_URL`: Postgres connection string; orders are kept in memory when unset
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub payment_service_url: String,
    pub inventory_service_url: String,
    pub remote_call_timeout: Duration,
    pub database_url: Option<String>,
}

const DEFAULT_PAYMENT_SERVICE_URL: &str = "http://payment-service:8081";
const DEFAULT_INVENTORY_SERVICE_URL: &str = "http://inventory-service:8082";
const DEFAULT_REMOTE_CALL_TIMEOUT_MS: u64 = 5000;

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            payment_service_url: std::env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_SERVICE_URL.to_string()),
            inventory_service_url: std::env::var("INVENTORY_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_INVENTORY_SERVICE_URL.to_string()),
            remote_call_timeout: Duration::from_millis(
                std::env::var("REMOTE_CALL_TIMEOUT_MS")
                    .ok()
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(DEFAULT_REMOTE_CALL_TIMEOUT_MS),
            ),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            payment_service_url: DEFAULT_PAYMENT_SERVICE_URL.to_string(),
            inventory_service_url: DEFAULT_INVENTORY_SERVICE_URL.to_string(),
            remote_call_timeout: Duration::from_millis(DEFAULT_REMOTE_CALL_TIMEOUT_MS),
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.payment_service_url, "http://payment-service:8081");
        assert_eq!(config.inventory_service_url, "http://inventory-service:8082");
        assert_eq!(config.remote_call_timeout, Duration::from_secs(5));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_addr_default() {
        let config = Config::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }
}
