//! Port for the remote avatar source.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use crate::domain::entities::{AvatarKey, FetchOutcome};
use crate::domain::errors::AvatarError;

/// Avatar image bytes of unknown total length, delivered in chunks.
pub type AvatarByteStream = BoxStream<'static, Result<Bytes, AvatarError>>;

/// Source of the two resources that make up an avatar.
///
/// Both methods report "not found" as [`FetchOutcome::Absent`] and every
/// other failure as [`FetchOutcome::Failed`]. Implementations must be
/// thread-safe and must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarSourcePort: Send + Sync {
    /// Opens the avatar image bytes for the given user.
    async fn fetch_binary(&self, key: &AvatarKey) -> FetchOutcome<AvatarByteStream>;

    /// Fetches the media subtype token (`jpeg`, `png`) for the given user.
    async fn fetch_content_type(&self, key: &AvatarKey) -> FetchOutcome<String>;
}
