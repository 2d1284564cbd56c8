//! Infrastructure layer with external service adapters.

/// Avatar source adapters (HTTP endpoint, local directory).
pub mod avatar;
/// Application configuration.
pub mod config;

pub use avatar::{HttpAvatarSource, HttpSourceError, HttpSourceSettings, LocalAvatarSource};
pub use config::{AppConfig, CliArgs, Command, ConfigError, EndpointConfig, LogLevel, StorageManager};
