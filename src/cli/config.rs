//! Configuration management for crunchdigest
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.crunchdigest/config.toml

use crate::article::{SourceRules, DEFAULT_ARTICLE_HOST, DEFAULT_DOMAIN_MARKER, DEFAULT_SHARE_HOST};
use crate::cli::Verbosity;
use crate::errors::{Result, SummaryError};
use crate::session::{FailurePolicy, SessionOptions};
use crate::streaming::{DEFAULT_ENDPOINT_URL, DEFAULT_SUMMARIZE_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the file holding the current location
pub const LOCATION_FILE: &str = "location.json";

/// Complete configuration for crunchdigest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub source: SourceConfig,
    pub session: SessionConfig,
    pub display: DisplayConfig,
    pub paths: PathsConfig,
}

/// Summarization endpoint connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub summarize_path: String,
    pub connect_timeout_secs: u64,
}

/// Accepted source and link hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub domain_marker: String,
    pub article_host: String,
    pub share_host: String,
}

/// Session behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub failure_policy: FailurePolicy,
}

/// Terminal display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub default_verbosity: String,
    pub show_spinner: bool,
    pub color_output: bool,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT_URL.to_string(),
            summarize_path: DEFAULT_SUMMARIZE_PATH.to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            domain_marker: DEFAULT_DOMAIN_MARKER.to_string(),
            article_host: DEFAULT_ARTICLE_HOST.to_string(),
            share_host: DEFAULT_SHARE_HOST.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            show_spinner: true,
            color_output: true,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.crunchdigest".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SummaryError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| SummaryError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".crunchdigest").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(SummaryError::ConfigError(
                "endpoint.base_url must not be empty".to_string(),
            ));
        }

        if !self.endpoint.summarize_path.starts_with('/') {
            return Err(SummaryError::ConfigError(
                "endpoint.summarize_path must start with '/'".to_string(),
            ));
        }

        if self.endpoint.connect_timeout_secs == 0 {
            return Err(SummaryError::ConfigError(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("source.domain_marker", &self.source.domain_marker),
            ("source.article_host", &self.source.article_host),
            ("source.share_host", &self.source.share_host),
        ] {
            if value.trim().is_empty() {
                return Err(SummaryError::ConfigError(format!("{} must not be empty", name)));
            }
        }

        if !self.source.article_host.contains(self.source.domain_marker.as_str()) {
            return Err(SummaryError::ConfigError(
                "source.article_host must contain source.domain_marker".to_string(),
            ));
        }

        if Verbosity::parse(&self.display.default_verbosity).is_none() {
            return Err(SummaryError::ConfigError(format!(
                "Invalid verbosity level: {}",
                self.display.default_verbosity
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SummaryError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SummaryError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SummaryError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.connect_timeout_secs)
    }

    /// Verbosity configured as default
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::parse(&self.display.default_verbosity).unwrap_or(Verbosity::Normal)
    }

    pub fn source_rules(&self) -> SourceRules {
        SourceRules {
            domain_marker: self.source.domain_marker.clone(),
            article_host: self.source.article_host.clone(),
            share_host: self.source.share_host.clone(),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            rules: self.source_rules(),
            failure_policy: self.session.failure_policy,
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    /// File the navigator stores the current location in
    pub fn location_file(&self) -> PathBuf {
        self.state_dir().join(LOCATION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.endpoint.summarize_path, "/api/summarize");
        assert_eq!(config.source.domain_marker, "techcrunch.com");
        assert_eq!(config.session.failure_policy, FailurePolicy::ResetToIdle);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_path() {
        let mut config = Config::default();
        config.endpoint.summarize_path = "api/summarize".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_timeout() {
        let mut config = Config::default();
        config.endpoint.connect_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_marker() {
        let mut config = Config::default();
        config.source.domain_marker = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.article_host = "https://example.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_verbosity() {
        let mut config = Config::default();
        config.display.default_verbosity = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [endpoint]
            base_url = "https://techcrunchsummary.com"

            [session]
            failure_policy = "hold_in_flight"
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint.base_url, "https://techcrunchsummary.com");
        assert_eq!(config.endpoint.summarize_path, "/api/summarize");
        assert_eq!(config.session.failure_policy, FailurePolicy::HoldInFlight);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.endpoint.base_url = "http://localhost:9999".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded.endpoint.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.crunchdigest");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        assert_eq!(Config::expand_path(path).to_string_lossy(), path);
    }

    #[test]
    fn test_session_options() {
        let options = Config::default().session_options();
        assert_eq!(options.rules, SourceRules::default());
    }
}
