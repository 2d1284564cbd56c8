//! Avatar cache - a write-once, process-wide avatar image cache.
//!
//! Avatars are fetched lazily from a remote endpoint as two paired
//! resources (image bytes and media subtype) and stored as embeddable
//! `data:image/...;base64,...` strings.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the avatar cache service.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

pub use application::{AvatarCache, CacheStats};
pub use domain::{AvatarError, AvatarKey, AvatarSourcePort, EncodedAvatar, FetchOutcome};

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "avatar-cache";
