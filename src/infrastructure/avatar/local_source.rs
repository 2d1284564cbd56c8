//! File-backed avatar source.
//!
//! Resolves `{dir}/{name}.jpg`, falling back to `{dir}/{name}.png`, where
//! `name` is the lowercased user id with German umlauts and `ß` spelled
//! out. The content type is the resolved file's extension.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, trace, warn};

use crate::domain::entities::{AvatarKey, FetchOutcome};
use crate::domain::errors::{AvatarError, AvatarResource};
use crate::domain::ports::{AvatarByteStream, AvatarSourcePort};

const READ_CHUNK_SIZE: usize = 16 * 1024;
const EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// Maps a user id onto the avatar file stem.
#[must_use]
pub fn avatar_file_stem(user: &str) -> String {
    user.to_lowercase()
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss")
}

/// Serves avatars from a local directory.
#[derive(Debug, Clone)]
pub struct LocalAvatarSource {
    dir: PathBuf,
}

impl LocalAvatarSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the avatar directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Finds the avatar file for the user, if any.
    async fn resolve(
        &self,
        key: &AvatarKey,
        resource: AvatarResource,
    ) -> Result<Option<PathBuf>, AvatarError> {
        let stem = avatar_file_stem(key.as_str());
        if stem.is_empty() || stem.contains(['/', '\\']) || stem.starts_with('.') {
            debug!(user = %key, "User id cannot name an avatar file");
            return Ok(None);
        }

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{stem}.{ext}"));
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {
                    trace!(user = %key, path = %path.display(), "Avatar file found");
                    return Ok(Some(path));
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(user = %key, path = %path.display(), error = %e, "Failed to stat avatar file");
                    return Err(AvatarError::io(resource, e.to_string()));
                }
            }
        }

        debug!(user = %key, stem = %stem, "No avatar file");
        Ok(None)
    }
}

#[async_trait]
impl AvatarSourcePort for LocalAvatarSource {
    async fn fetch_binary(&self, key: &AvatarKey) -> FetchOutcome<AvatarByteStream> {
        let path = match self.resolve(key, AvatarResource::Binary).await {
            Ok(Some(path)) => path,
            Ok(None) => return FetchOutcome::Absent,
            Err(e) => return FetchOutcome::Failed(e),
        };

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return FetchOutcome::Absent,
            Err(e) => {
                return FetchOutcome::Failed(AvatarError::io(AvatarResource::Binary, e.to_string()));
            }
        };

        let stream = futures_util::stream::try_unfold(file, |mut file| async move {
            let mut buf = vec![0u8; READ_CHUNK_SIZE];
            let read = file
                .read(&mut buf)
                .await
                .map_err(|e| AvatarError::io(AvatarResource::Binary, e.to_string()))?;
            if read == 0 {
                return Ok::<_, AvatarError>(None);
            }
            buf.truncate(read);
            Ok(Some((Bytes::from(buf), file)))
        });

        FetchOutcome::Found(stream.boxed())
    }

    async fn fetch_content_type(&self, key: &AvatarKey) -> FetchOutcome<String> {
        match self.resolve(key, AvatarResource::ContentType).await {
            Ok(Some(path)) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(FetchOutcome::Absent, |ext| FetchOutcome::Found(ext.to_string())),
            Ok(None) => FetchOutcome::Absent,
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::TempDir;
    use test_case::test_case;

    use crate::application::AvatarCache;
    use crate::domain::entities::EncodedAvatar;

    #[test_case("Alice", "alice" ; "lowercase")]
    #[test_case("Jörg", "joerg" ; "o_umlaut")]
    #[test_case("ÄRGER", "aerger" ; "upper_a_umlaut")]
    #[test_case("Müßig", "muessig" ; "u_umlaut_and_eszett")]
    fn test_file_stem(user: &str, expected: &str) {
        assert_eq!(avatar_file_stem(user), expected);
    }

    #[tokio::test]
    async fn test_jpg_preferred_over_png() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("alice.jpg"), [1u8, 2, 3])?;
        std::fs::write(dir.path().join("alice.png"), [9u8])?;
        let source = LocalAvatarSource::new(dir.path());

        let outcome = source.fetch_content_type(&AvatarKey::new("Alice")).await;
        assert!(matches!(outcome, FetchOutcome::Found(ref ext) if ext == "jpg"));
        Ok(())
    }

    #[tokio::test]
    async fn test_png_fallback_with_umlaut() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("joerg.png"), [7u8, 7])?;
        let source = LocalAvatarSource::new(dir.path());

        let outcome = source.fetch_content_type(&AvatarKey::new("Jörg")).await;
        assert!(matches!(outcome, FetchOutcome::Found(ref ext) if ext == "png"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_absent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let source = LocalAvatarSource::new(dir.path());
        let key = AvatarKey::new("ghost");

        assert!(source.fetch_binary(&key).await.is_absent());
        assert!(source.fetch_content_type(&key).await.is_absent());
        Ok(())
    }

    #[tokio::test]
    async fn test_path_like_user_is_absent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("secret.png"), [1u8])?;
        let nested = dir.path().join("avatars");
        std::fs::create_dir(&nested)?;
        let source = LocalAvatarSource::new(&nested);

        assert!(source.fetch_binary(&AvatarKey::new("../secret")).await.is_absent());
        Ok(())
    }

    #[tokio::test]
    async fn test_large_file_through_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let payload: Vec<u8> = (0..70_000u32).map(|i| (i % 253) as u8).collect();
        std::fs::write(dir.path().join("bob.png"), &payload)?;
        let cache = AvatarCache::new(Arc::new(LocalAvatarSource::new(dir.path())));

        let encoded = cache.get_avatar_encoded("Bob").await?;
        let avatar = EncodedAvatar::parse(encoded)?;

        assert_eq!(avatar.media_subtype(), "png");
        assert_eq!(avatar.decode_payload()?, payload);
        Ok(())
    }
}
