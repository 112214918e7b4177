//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Largest accepted CSV upload, in bytes
    pub max_upload_bytes: usize,

    /// Seed used by the isolation forest when the request omits one
    pub default_seed: u64,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            max_upload_bytes: 50 * 1024 * 1024,
            default_seed: 42,
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),

            default_seed: env::var("DEFAULT_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_seed),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Structured JSON logs requested
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json") || self.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_seed, 42);
        assert!(!config.is_production());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_production_forces_json_logs() {
        let config = Config {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(config.json_logs());
    }
}
