//! Self-describing, embeddable avatar image string.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::errors::AvatarError;

const SCHEME_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// An avatar encoded as `data:image/{subtype};base64,{payload}`.
///
/// Usable directly as an image source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedAvatar(String);

impl EncodedAvatar {
    /// Encodes raw image bytes under the given media subtype.
    #[must_use]
    pub fn encode(subtype: &str, bytes: &[u8]) -> Self {
        let payload = STANDARD.encode(bytes);
        let mut encoded = String::with_capacity(
            SCHEME_PREFIX.len() + subtype.len() + BASE64_MARKER.len() + payload.len(),
        );
        encoded.push_str(SCHEME_PREFIX);
        encoded.push_str(subtype);
        encoded.push_str(BASE64_MARKER);
        encoded.push_str(&payload);
        Self(encoded)
    }

    /// Validates an existing data URI.
    ///
    /// # Errors
    /// Returns error if the prefix, subtype or payload is malformed.
    pub fn parse(value: impl Into<String>) -> Result<Self, AvatarError> {
        let candidate = Self(value.into());
        candidate.decode_payload()?;
        Ok(candidate)
    }

    /// Returns the media subtype, e.g. `jpeg`.
    #[must_use]
    pub fn media_subtype(&self) -> &str {
        self.split().map_or("", |(subtype, _)| subtype)
    }

    /// Decodes the base64 payload back into raw bytes.
    ///
    /// A single space after the comma is tolerated.
    ///
    /// # Errors
    /// Returns error if the string is not a base64 image data URI.
    pub fn decode_payload(&self) -> Result<Vec<u8>, AvatarError> {
        let (_, payload) = self.split()?;
        let payload = payload.strip_prefix(' ').unwrap_or(payload);
        STANDARD
            .decode(payload)
            .map_err(|e| AvatarError::invalid_encoding(format!("bad base64 payload: {e}")))
    }

    /// Returns the encoded string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes and returns the encoded string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    fn split(&self) -> Result<(&str, &str), AvatarError> {
        let rest = self
            .0
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| AvatarError::invalid_encoding("missing data:image/ prefix"))?;
        let (subtype, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| AvatarError::invalid_encoding("missing ;base64, marker"))?;
        if subtype.is_empty() {
            return Err(AvatarError::invalid_encoding("empty media subtype"));
        }
        Ok((subtype, payload))
    }
}

impl std::fmt::Display for EncodedAvatar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EncodedAvatar> for String {
    fn from(avatar: EncodedAvatar) -> Self {
        avatar.0
    }
}
