//! Avatar lookup error types.

use thiserror::Error;

/// One of the two remote resources that make up an avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarResource {
    /// The raw image bytes.
    Binary,
    /// The media subtype token (`jpeg`, `png`, ...).
    ContentType,
}

impl std::fmt::Display for AvatarResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::ContentType => write!(f, "content-type"),
        }
    }
}

/// Avatar error variants.
///
/// "Not found" is deliberately absent here: it is a normal outcome and is
/// carried by [`FetchOutcome::Absent`](crate::domain::entities::FetchOutcome).
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum AvatarError {
    #[error("failed to fetch avatar {resource}: {message}")]
    Transport {
        resource: AvatarResource,
        message: String,
    },

    #[error("avatar io error on {resource}: {message}")]
    Io {
        resource: AvatarResource,
        message: String,
    },

    #[error("invalid encoded avatar: {reason}")]
    InvalidEncoding { reason: String },
}

impl AvatarError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(resource: AvatarResource, message: impl Into<String>) -> Self {
        Self::Transport {
            resource,
            message: message.into(),
        }
    }

    /// Creates io error.
    #[must_use]
    pub fn io(resource: AvatarResource, message: impl Into<String>) -> Self {
        Self::Io {
            resource,
            message: message.into(),
        }
    }

    /// Creates invalid encoding error.
    #[must_use]
    pub fn invalid_encoding(reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            reason: reason.into(),
        }
    }

    /// Returns whether error came from the remote transport.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns the resource the error relates to, if any.
    #[must_use]
    pub const fn resource(&self) -> Option<AvatarResource> {
        match self {
            Self::Transport { resource, .. } | Self::Io { resource, .. } => Some(*resource),
            Self::InvalidEncoding { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_message_names_resource() {
        let err = AvatarError::transport(AvatarResource::ContentType, "HTTP 500");
        assert_eq!(
            err.to_string(),
            "failed to fetch avatar content-type: HTTP 500"
        );
        assert!(err.is_transport());
        assert_eq!(err.resource(), Some(AvatarResource::ContentType));
    }

    #[test]
    fn test_encoding_error_has_no_resource() {
        let err = AvatarError::invalid_encoding("missing prefix");
        assert!(!err.is_transport());
        assert_eq!(err.resource(), None);
    }
}
