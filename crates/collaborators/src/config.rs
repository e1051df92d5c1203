//! Service configuration loaded from environment variables.

/// Listen settings for a collaborator service.
///
/// Reads `HOST` (default `"0.0.0.0"`) and `PORT` (default depends on the
/// service).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Loads configuration from the environment, using `default_port` when
    /// `PORT` is unset or invalid.
    pub fn from_env(default_port: u16) -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(default_port),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8081,
        };
        assert_eq!(config.addr(), "127.0.0.1:8081");
    }
}
