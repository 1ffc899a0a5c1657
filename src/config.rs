//! Application configuration
//!
//! Layering, lowest precedence first:
//! - built-in defaults
//! - `tokenholic.toml` (optional)
//! - `TOKENHOLIC__SECTION__KEY` environment variables
//! - `MOCK_API` / `API_BASE_URL` for the service mode switch

use crate::error::Result;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file, then apply environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENHOLIC")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(Config {
            service: config.service.from_env(),
            ..config
        })
    }

    /// Load `.env` and the default `tokenholic.toml`
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_file("tokenholic")
    }
}

/// Which service implementation set backs the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Mock,
    Http,
}

/// Service façade configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Force mock mode even when a backend is configured
    #[serde(default)]
    pub mock: bool,

    /// Backend base URL, including the API prefix
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent to the backend
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 { 30_000 }

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mock: false,
            base_url: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ServiceConfig {
    /// Apply `MOCK_API` and `API_BASE_URL` overrides
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("MOCK_API") {
            self.mock = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("API_BASE_URL") {
            self.base_url = Some(val);
        }

        if let Ok(val) = std::env::var("API_KEY") {
            if !val.is_empty() {
                self.api_key = Some(SecretString::new(val));
            }
        }

        self
    }

    /// Resolve the operating mode. A missing backend address forces mock mode.
    pub fn mode(&self) -> ServiceMode {
        let has_backend = self
            .base_url
            .as_deref()
            .map_or(false, |url| !url.trim().is_empty());

        if self.mock || !has_backend {
            ServiceMode::Mock
        } else {
            ServiceMode::Http
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Simulated latency of each mock operation, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockConfig {
    #[serde(default = "default_token_map_generate_ms")]
    pub token_map_generate_ms: u64,
    #[serde(default = "default_short_ms")]
    pub token_map_get_ms: u64,
    #[serde(default = "default_short_ms")]
    pub token_map_update_ms: u64,
    #[serde(default = "default_short_ms")]
    pub token_map_list_ms: u64,
    #[serde(default = "default_medium_ms")]
    pub token_map_export_ms: u64,
    #[serde(default = "default_solution_recommend_ms")]
    pub solution_recommend_ms: u64,
    #[serde(default = "default_short_ms")]
    pub solution_get_ms: u64,
    #[serde(default = "default_solution_refine_ms")]
    pub solution_refine_ms: u64,
    #[serde(default = "default_short_ms")]
    pub solution_history_ms: u64,
    #[serde(default = "default_medium_ms")]
    pub role_play_start_ms: u64,
    #[serde(default = "default_role_play_respond_ms")]
    pub role_play_respond_ms: u64,
    #[serde(default = "default_medium_ms")]
    pub role_play_end_ms: u64,
    #[serde(default = "default_short_ms")]
    pub role_play_get_ms: u64,
    #[serde(default = "default_short_ms")]
    pub role_play_list_ms: u64,
}

fn default_short_ms() -> u64 { 500 }
fn default_medium_ms() -> u64 { 1000 }
fn default_token_map_generate_ms() -> u64 { 2000 }
fn default_solution_recommend_ms() -> u64 { 3000 }
fn default_solution_refine_ms() -> u64 { 2500 }
fn default_role_play_respond_ms() -> u64 { 1500 }

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            token_map_generate_ms: default_token_map_generate_ms(),
            token_map_get_ms: default_short_ms(),
            token_map_update_ms: default_short_ms(),
            token_map_list_ms: default_short_ms(),
            token_map_export_ms: default_medium_ms(),
            solution_recommend_ms: default_solution_recommend_ms(),
            solution_get_ms: default_short_ms(),
            solution_refine_ms: default_solution_refine_ms(),
            solution_history_ms: default_short_ms(),
            role_play_start_ms: default_medium_ms(),
            role_play_respond_ms: default_role_play_respond_ms(),
            role_play_end_ms: default_medium_ms(),
            role_play_get_ms: default_short_ms(),
            role_play_list_ms: default_short_ms(),
        }
    }
}

impl MockConfig {
    /// Every operation resolves immediately
    pub fn instant() -> Self {
        Self::uniform(0)
    }

    /// Every operation waits the same number of milliseconds
    pub fn uniform(ms: u64) -> Self {
        Self {
            token_map_generate_ms: ms,
            token_map_get_ms: ms,
            token_map_update_ms: ms,
            token_map_list_ms: ms,
            token_map_export_ms: ms,
            solution_recommend_ms: ms,
            solution_get_ms: ms,
            solution_refine_ms: ms,
            solution_history_ms: ms,
            role_play_start_ms: ms,
            role_play_respond_ms: ms,
            role_play_end_ms: ms,
            role_play_get_ms: ms,
            role_play_list_ms: ms,
        }
    }
}

/// Local key/value storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".tokenholic/local_storage.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_api_prefix() -> String { "/api/v1".to_string() }
fn default_max_body_bytes() -> usize { 2 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
