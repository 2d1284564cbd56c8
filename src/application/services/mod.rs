//! Application services.

pub mod avatar_cache;

pub use avatar_cache::{AvatarCache, CacheStats};
