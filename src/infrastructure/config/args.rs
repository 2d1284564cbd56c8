use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "avatar-cache",
    version,
    about = "Look up user avatars and print them as embeddable data URIs",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Avatar endpoint root URL.
    #[arg(long, env = "AVATAR_CACHE_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Serve avatars from a local directory instead of the endpoint.
    #[arg(long, value_name = "DIR")]
    pub avatar_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print whether each user has an avatar.
    Has {
        /// User identifiers.
        #[arg(required = true)]
        users: Vec<String>,
    },
    /// Print each user's avatar as a data URI (empty line if none).
    Get {
        /// User identifiers.
        #[arg(required = true)]
        users: Vec<String>,
    },
}

impl Command {
    /// Returns the requested user identifiers.
    #[must_use]
    pub fn users(&self) -> &[String] {
        match self {
            Self::Has { users } | Self::Get { users } => users,
        }
    }
}
