//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::avatar::{
    DEFAULT_BINARY_ROUTE, DEFAULT_CONTENT_TYPE_ROUTE, HttpSourceSettings,
};

use super::args::CliArgs;

pub(crate) const APP_NAME: &str = "avatar-cache";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "pnyx";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from `config.toml` and overridden by CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Serve avatars from this directory instead of the remote endpoint.
    #[serde(default)]
    pub avatar_dir: Option<PathBuf>,

    /// Remote avatar endpoint settings.
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

/// Remote avatar endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route serving avatar image bytes.
    #[serde(default = "default_binary_route")]
    pub binary_route: String,

    /// Route serving the avatar media subtype.
    #[serde(default = "default_content_type_route")]
    pub content_type_route: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            binary_route: default_binary_route(),
            content_type_route: default_content_type_route(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl EndpointConfig {
    /// Converts into HTTP source settings.
    #[must_use]
    pub fn to_settings(&self) -> HttpSourceSettings {
        let mut settings = HttpSourceSettings::new(self.base_url.clone());
        settings.binary_route.clone_from(&self.binary_route);
        settings.content_type_route.clone_from(&self.content_type_route);
        settings.timeout = Duration::from_secs(self.timeout_secs);
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent.clone_from(user_agent);
        }
        settings
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/".to_string()
}

fn default_binary_route() -> String {
    DEFAULT_BINARY_ROUTE.to_string()
}

fn default_content_type_route() -> String {
    DEFAULT_CONTENT_TYPE_ROUTE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(base_url) = &args.base_url {
            self.endpoint.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.endpoint.timeout_secs = timeout_secs;
        }
        if let Some(avatar_dir) = &args.avatar_dir {
            self.avatar_dir = Some(avatar_dir.clone());
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            avatar_dir: None,
            endpoint: EndpointConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [endpoint]
            base_url = "https://pnyx.example/api/"
            timeout_secs = 5
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.endpoint.base_url, "https://pnyx.example/api/");
        assert_eq!(config.endpoint.binary_route, DEFAULT_BINARY_ROUTE);
        assert_eq!(config.endpoint.timeout_secs, 5);
        assert_eq!(config.avatar_dir, None);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.endpoint.content_type_route, DEFAULT_CONTENT_TYPE_ROUTE);
        assert_eq!(config.endpoint.timeout_secs, 30);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [endpoint]
            base_url = "https://file.example/"
            timeout_secs = 10
            "#,
        )
        .expect("Failed to parse config");
        let args = CliArgs::parse_from([
            "avatar-cache",
            "--base-url",
            "https://cli.example/",
            "--log-level",
            "warn",
            "has",
            "alice",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.endpoint.base_url, "https://cli.example/");
        assert_eq!(config.endpoint.timeout_secs, 10);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_endpoint_settings() {
        let endpoint = EndpointConfig {
            timeout_secs: 7,
            user_agent: Some("pnyx-ui".to_string()),
            ..EndpointConfig::default()
        };

        let settings = endpoint.to_settings();

        assert_eq!(settings.timeout, Duration::from_secs(7));
        assert_eq!(settings.user_agent, "pnyx-ui");
        assert_eq!(settings.binary_route, DEFAULT_BINARY_ROUTE);
    }
}
