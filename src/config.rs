use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API bearer token
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL of the streaming host probed for availability
    #[serde(default = "default_stream_base_url")]
    pub stream_base_url: String,

    /// Comma-separated list of allowed CORS origins
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-probe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Maximum in-flight probes during a series availability check
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,

    /// Requests allowed per client per minute
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_stream_base_url() -> String {
    "https://vixsrc.to".to_string()
}

fn default_allowed_origins() -> String {
    "http://localhost:3000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_probe_timeout_secs() -> u64 {
    3
}

fn default_probe_concurrency() -> usize {
    10
}

fn default_rate_limit_per_minute() -> u32 {
    60
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Validate the TMDB API key before the server starts taking traffic.
    pub fn validate_api_key(&self) -> AppResult<()> {
        if self.tmdb_api_key.is_empty() {
            return Err(AppError::Authentication("API key is required".to_string()));
        }
        if self.tmdb_api_key.len() < 10 {
            return Err(AppError::Authentication(
                "Invalid API key format".to_string(),
            ));
        }
        Ok(())
    }

    /// CORS origins as individual entries.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            tmdb_api_key: "a-long-enough-test-key".to_string(),
            tmdb_api_url: default_tmdb_api_url(),
            stream_base_url: default_stream_base_url(),
            allowed_origins: "http://localhost:3000, https://portal.example.com".to_string(),
            host: default_host(),
            port: default_port(),
            probe_timeout_secs: default_probe_timeout_secs(),
            probe_concurrency: default_probe_concurrency(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
        }
    }

    #[test]
    fn test_origins_split_and_trimmed() {
        let config = test_config();
        assert_eq!(
            config.origins(),
            vec![
                "http://localhost:3000".to_string(),
                "https://portal.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_api_key_validation() {
        let mut config = test_config();
        assert!(config.validate_api_key().is_ok());

        config.tmdb_api_key = "short".to_string();
        assert!(config.validate_api_key().is_err());

        config.tmdb_api_key = String::new();
        assert!(config.validate_api_key().is_err());
    }
}
