//! Application layer with the avatar cache service.

/// Stateful services.
pub mod services;

pub use services::{AvatarCache, CacheStats};
