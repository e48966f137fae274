//! Configuration management for dealscrape
//!
//! This module handles loading and validating configuration from environment
//! variables. The Gemini API key is read here once and handed to the chat
//! client at construction time; nothing reads it from the environment later.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scraper configuration
    pub scraper: ScraperConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// LLM chat configuration
    pub llm: LlmSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Scraper-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Rate limit (requests per second)
    pub rate_limit: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum retry attempts per page fetch
    pub max_retries: u32,
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per scraped thread
    pub data_dir: PathBuf,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,
}

/// LLM chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Gemini API key; chat is disabled when absent
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let rate_limit = std::env::var("DEALSCRAPE_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(2);

        let request_timeout_secs = std::env::var("DEALSCRAPE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let max_retries = std::env::var("DEALSCRAPE_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let data_dir = std::env::var("DEALSCRAPE_DATA_DIR")
            .unwrap_or_else(|_| String::from("scraped_data"))
            .into();

        let host = std::env::var("DEALSCRAPE_HOST").unwrap_or_else(|_| String::from("0.0.0.0"));

        let port = std::env::var("DEALSCRAPE_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);

        let api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());

        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from("gemini-2.0-flash"));

        let llm_timeout_secs = std::env::var("GEMINI_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let log_level =
            std::env::var("DEALSCRAPE_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("DEALSCRAPE_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            scraper: ScraperConfig {
                rate_limit,
                request_timeout_secs,
                max_retries,
            },
            storage: StorageConfig { data_dir },
            server: ServerConfig { host, port },
            llm: LlmSettings {
                api_key,
                model,
                timeout_secs: llm_timeout_secs,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scraper.rate_limit == 0 {
            anyhow::bail!("rate_limit must be at least 1 request per second");
        }
        if self.scraper.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be non-zero");
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            anyhow::bail!("data_dir must not be empty");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig {
                rate_limit: 2,
                request_timeout_secs: 30,
                max_retries: 3,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("scraped_data"),
            },
            server: ServerConfig {
                host: String::from("0.0.0.0"),
                port: 8000,
            },
            llm: LlmSettings {
                api_key: None,
                model: String::from("gemini-2.0-flash"),
                timeout_secs: 60,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
