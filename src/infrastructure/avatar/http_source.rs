//! HTTP adapter for the remote avatar endpoint pair.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::domain::entities::{AvatarKey, FetchOutcome};
use crate::domain::errors::{AvatarError, AvatarResource};
use crate::domain::ports::{AvatarByteStream, AvatarSourcePort};

/// Default route serving the avatar image bytes.
pub const DEFAULT_BINARY_ROUTE: &str = "User/Avatar";
/// Default route serving the avatar media subtype.
pub const DEFAULT_CONTENT_TYPE_ROUTE: &str = "User/AvatarContentType";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building the HTTP source.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum HttpSourceError {
    /// Base URL cannot be parsed or cannot carry a path.
    #[error("invalid avatar endpoint {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// HTTP client construction failed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Settings for [`HttpAvatarSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceSettings {
    /// Endpoint root, e.g. `https://pnyx.example/api/`.
    pub base_url: String,
    /// Route under the root serving image bytes.
    pub binary_route: String,
    /// Route under the root serving the media subtype.
    pub content_type_route: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
}

impl HttpSourceSettings {
    /// Creates settings with default routes and timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            binary_route: DEFAULT_BINARY_ROUTE.to_string(),
            content_type_route: DEFAULT_CONTENT_TYPE_ROUTE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Fetches avatars from `GET {base}/{binary_route}/{user}` and
/// `GET {base}/{content_type_route}/{user}`.
///
/// 404 is `Absent`; every other non-success status and every transport
/// failure is `Failed`. No retries.
pub struct HttpAvatarSource {
    client: Client,
    base_url: Url,
    binary_route: String,
    content_type_route: String,
}

impl HttpAvatarSource {
    /// Creates a source from settings.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: HttpSourceSettings) -> Result<Self, HttpSourceError> {
        let base_url =
            Url::parse(&settings.base_url).map_err(|e| HttpSourceError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(HttpSourceError::InvalidBaseUrl {
                url: settings.base_url,
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .user_agent(settings.user_agent)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| HttpSourceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            binary_route: settings.binary_route,
            content_type_route: settings.content_type_route,
        })
    }

    /// Builds the resource URL; the key becomes one percent-encoded segment.
    ///
    /// Returns `None` for keys that cannot name a path segment (empty,
    /// `.` and `..`), which would otherwise address the bare route.
    fn resource_url(&self, route: &str, key: &AvatarKey) -> Result<Option<Url>, String> {
        if matches!(key.as_str(), "" | "." | "..") {
            return Ok(None);
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| "URL cannot carry a path".to_string())?
            .pop_if_empty()
            .extend(route.split('/').filter(|s| !s.is_empty()))
            .push(key.as_str());
        Ok(Some(url))
    }

    async fn request(
        &self,
        resource: AvatarResource,
        key: &AvatarKey,
    ) -> FetchOutcome<reqwest::Response> {
        let route = match resource {
            AvatarResource::Binary => &self.binary_route,
            AvatarResource::ContentType => &self.content_type_route,
        };
        let url = match self.resource_url(route, key) {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!(user = %key, %resource, "User id cannot name an avatar resource");
                return FetchOutcome::Absent;
            }
            Err(reason) => return FetchOutcome::Failed(AvatarError::transport(resource, reason)),
        };

        debug!(user = %key, %resource, url = %url, "Requesting avatar resource");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(user = %key, %resource, error = %e, "Avatar request failed");
                return FetchOutcome::Failed(AvatarError::transport(resource, describe(&e)));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(user = %key, %resource, "Avatar resource not found");
            return FetchOutcome::Absent;
        }
        if !status.is_success() {
            warn!(user = %key, %resource, %status, "Unexpected avatar response");
            return FetchOutcome::Failed(AvatarError::transport(
                resource,
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        FetchOutcome::Found(response)
    }
}

impl std::fmt::Debug for HttpAvatarSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAvatarSource")
            .field("base_url", &self.base_url.as_str())
            .field("binary_route", &self.binary_route)
            .field("content_type_route", &self.content_type_route)
            .finish_non_exhaustive()
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "failed to connect to avatar endpoint".to_string()
    } else {
        e.to_string()
    }
}

#[async_trait]
impl AvatarSourcePort for HttpAvatarSource {
    async fn fetch_binary(&self, key: &AvatarKey) -> FetchOutcome<AvatarByteStream> {
        self.request(AvatarResource::Binary, key)
            .await
            .map(|response| {
                response
                    .bytes_stream()
                    .map(|chunk| {
                        chunk.map_err(|e| {
                            AvatarError::transport(
                                AvatarResource::Binary,
                                format!("failed to read body: {}", describe(&e)),
                            )
                        })
                    })
                    .boxed()
            })
    }

    async fn fetch_content_type(&self, key: &AvatarKey) -> FetchOutcome<String> {
        match self.request(AvatarResource::ContentType, key).await {
            FetchOutcome::Found(response) => match response.text().await {
                Ok(text) => FetchOutcome::Found(text),
                Err(e) => FetchOutcome::Failed(AvatarError::transport(
                    AvatarResource::ContentType,
                    format!("failed to read body: {}", describe(&e)),
                )),
            },
            FetchOutcome::Absent => FetchOutcome::Absent,
            FetchOutcome::Failed(e) => FetchOutcome::Failed(e),
        }
    }
}
