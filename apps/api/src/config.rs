use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Every upstream gateway is optional: a missing base URL or key leaves that
/// gateway unconfigured, and its endpoints answer 503 until it is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub chat_base: Option<String>,
    pub chat_api_key: Option<String>,
    pub scraper_base: Option<String>,
    pub scraper_api_key: Option<String>,
    pub publish_base: Option<String>,
    pub publish_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            ),
            chat_base: optional_env("CHAT_API_BASE"),
            chat_api_key: optional_env("CHAT_API_KEY"),
            scraper_base: optional_env("SCRAPER_API_BASE"),
            scraper_api_key: optional_env("SCRAPER_API_KEY"),
            publish_base: optional_env("PUBLISH_API_BASE"),
            publish_api_key: optional_env("PUBLISH_API_KEY"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("CARDPRESS_TEST_BLANK", "   ");
        assert!(optional_env("CARDPRESS_TEST_BLANK").is_none());
        std::env::set_var("CARDPRESS_TEST_BLANK", "value");
        assert_eq!(optional_env("CARDPRESS_TEST_BLANK").as_deref(), Some("value"));
        std::env::remove_var("CARDPRESS_TEST_BLANK");
    }

    #[test]
    fn test_optional_env_missing_key_is_none() {
        assert!(optional_env("CARDPRESS_TEST_NEVER_SET").is_none());
    }

    // PORT, RUST_LOG, and DATA_DIR are mutated in one test so the parallel
    // runner cannot interleave conflicting values.
    #[test]
    fn test_from_env_defaults_and_port_validation() {
        for key in ["PORT", "RUST_LOG", "DATA_DIR"] {
            std::env::remove_var(key);
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.data_dir, PathBuf::from("./data"));

        std::env::set_var("PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        std::env::remove_var("PORT");
    }
}
