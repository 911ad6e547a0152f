//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.query-assistant.toml` in current directory
//! 4. `~/.config/query-assistant/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [matcher]
//! disabled = ["slow_queries"]
//! known_tables = ["users", "orders", "products", "customers"]
//!
//! [[matcher.rules]]
//! key = "count_orders"
//! pattern = '(?:how many|count)\s+orders?'
//! template = "SELECT COUNT(*) as order_count FROM orders"
//! confidence = 0.95
//!
//! [dashboard]
//! url = "http://localhost:5002"
//! environment = "dev"
//!
//! [retry]
//! max_retries = 3
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//! backoff_factor = 2.0
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `DASHBOARD_URL` | Base URL of the dashboard API |
//! | `DASHBOARD_ENV` | Database environment (`dev`, `prod`) |
//! | `QUERY_ASSISTANT_LOG` | Log filter directives |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:5002";
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub matcher:   MatcherConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub retry:     RetryConfig
}

/// Intent matcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherConfig {
    /// Built-in rule keys to leave out of the table
    #[serde(default)]
    pub disabled:     Vec<String>,
    /// Extra rules appended after the built-ins
    #[serde(default)]
    pub rules:        Vec<CustomRuleConfig>,
    /// Tables the fallback path may guess, in priority order
    #[serde(default = "default_known_tables")]
    pub known_tables: Vec<String>
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            disabled:     Vec::new(),
            rules:        Vec::new(),
            known_tables: default_known_tables()
        }
    }
}

fn default_known_tables() -> Vec<String> {
    ["users", "orders", "products", "customers"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// A pattern rule declared in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct CustomRuleConfig {
    pub key:        String,
    pub pattern:    String,
    pub template:   String,
    pub confidence: f64
}

/// Dashboard API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub url:         Option<String>,
    pub environment: Option<String>
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url:         Some(String::from(DEFAULT_DASHBOARD_URL)),
            environment: Some(String::from(DEFAULT_ENVIRONMENT))
        }
    }
}

/// Retry configuration for dashboard requests
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_retries:      u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms:     u64,
    pub backoff_factor:   f64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries:      3,
            initial_delay_ms: 1000,
            max_delay_ms:     30000,
            backoff_factor:   2.0
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.query-assistant.toml)
    /// 3. Config file in home directory (~/.config/query-assistant/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("query-assistant")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Overrides home config
        let local_config = PathBuf::from(".query-assistant.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        if let Ok(url) = env::var("DASHBOARD_URL") {
            config.dashboard.url = Some(url);
        }

        if let Ok(environment) = env::var("DASHBOARD_ENV") {
            config.dashboard.environment = Some(environment);
        }

        Ok(config)
    }

    /// Parse a single config file
    pub fn from_file(path: &std::path::Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }
}
