//! Write-once avatar cache backed by an [`AvatarSourcePort`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use dashmap::DashMap;
use futures_util::StreamExt;
use tracing::{debug, trace, warn};

use crate::domain::entities::{AvatarKey, EncodedAvatar, FetchOutcome, combine};
use crate::domain::errors::AvatarError;
use crate::domain::ports::{AvatarByteStream, AvatarSourcePort};

/// Process-wide avatar cache.
///
/// Entries are created on the first joint fetch that finds both the image
/// bytes and the content type, and are then kept for the lifetime of the
/// cache. There is no eviction and no capacity bound: a long-lived process
/// that sees many distinct users grows without limit.
///
/// Concurrent first lookups for one key may each hit the source; the first
/// insert wins and every caller returns the stored value.
pub struct AvatarCache {
    source: Arc<dyn AvatarSourcePort>,
    entries: DashMap<String, EncodedAvatar>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AvatarCache {
    /// Creates an empty cache over the given source.
    #[must_use]
    pub fn new(source: Arc<dyn AvatarSourcePort>) -> Self {
        Self {
            source,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns whether the user has an avatar.
    ///
    /// Defined as `get_avatar_encoded(user)` being non-empty, so both
    /// calls always agree.
    ///
    /// # Errors
    /// Returns error if either fetch fails for a reason other than "not found".
    pub async fn has_avatar(&self, user: &str) -> Result<bool, AvatarError> {
        let encoded = self.get_avatar_encoded(user).await?;
        Ok(!encoded.is_empty())
    }

    /// Returns the user's avatar as a data URI, or an empty string when the
    /// source has no avatar for them.
    ///
    /// # Errors
    /// Returns error if either fetch fails for a reason other than "not found".
    pub async fn get_avatar_encoded(&self, user: &str) -> Result<String, AvatarError> {
        Ok(self
            .get_avatar(user)
            .await?
            .map(EncodedAvatar::into_string)
            .unwrap_or_default())
    }

    /// Returns the user's avatar, or `None` when the source has none.
    ///
    /// Absence is not cached: the next call asks the source again.
    ///
    /// # Errors
    /// Returns error if either fetch fails for a reason other than "not found".
    pub async fn get_avatar(&self, user: &str) -> Result<Option<EncodedAvatar>, AvatarError> {
        if let Some(entry) = self.entries.get(user) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(user = %user, "Avatar cache hit");
            return Ok(Some(entry.value().clone()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(user = %user, "Avatar cache miss");

        let key = AvatarKey::new(user);
        let Some(avatar) = self.fetch_joint(&key).await? else {
            debug!(user = %key, "No avatar available");
            return Ok(None);
        };

        let stored = self
            .entries
            .entry(key.into_string())
            .or_insert(avatar)
            .value()
            .clone();
        debug!(user = %user, subtype = stored.media_subtype(), "Stored avatar in cache");

        Ok(Some(stored))
    }

    /// Returns true if the user's avatar is already cached.
    #[must_use]
    pub fn contains(&self, user: &str) -> bool {
        self.entries.contains_key(user)
    }

    /// Returns the number of cached avatars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    async fn fetch_joint(&self, key: &AvatarKey) -> Result<Option<EncodedAvatar>, AvatarError> {
        debug!(user = %key, "Fetching avatar from source");

        let (binary, content_type) = tokio::join!(
            self.source.fetch_binary(key),
            self.source.fetch_content_type(key),
        );
        let content_type = normalize_content_type(content_type);

        let joint = combine(binary, content_type).inspect_err(|e| {
            warn!(user = %key, error = %e, "Avatar fetch failed");
        })?;

        let Some((stream, subtype)) = joint else {
            return Ok(None);
        };

        let bytes = drain(stream).await.inspect_err(|e| {
            warn!(user = %key, error = %e, "Avatar download interrupted");
        })?;
        trace!(user = %key, len = bytes.len(), "Avatar bytes received");

        Ok(Some(EncodedAvatar::encode(&subtype, &bytes)))
    }
}

impl std::fmt::Debug for AvatarCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarCache")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Trims whitespace and surrounding quotes; an empty token counts as absent.
fn normalize_content_type(outcome: FetchOutcome<String>) -> FetchOutcome<String> {
    match outcome {
        FetchOutcome::Found(raw) => {
            let token = raw.trim().trim_matches('"').trim();
            if token.is_empty() {
                FetchOutcome::Absent
            } else {
                FetchOutcome::Found(token.to_string())
            }
        }
        other => other,
    }
}

/// Reads the stream to its end into one contiguous buffer.
async fn drain(mut stream: AvatarByteStream) -> Result<Vec<u8>, AvatarError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.to_vec())
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: u64,
    /// Number of lookups that went to the source.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached avatars.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} avatars, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}
