//! User identifier used as the avatar cache key.

/// Opaque, case-sensitive user identifier.
///
/// The cache never normalizes keys: `Alice` and `alice` are distinct
/// entries. Adapters that need a normalized form derive it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvatarKey(String);

impl AvatarKey {
    /// Creates a new key from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AvatarKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AvatarKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AvatarKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for AvatarKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_case_sensitive() {
        assert_ne!(AvatarKey::new("Alice"), AvatarKey::new("alice"));
    }

    #[test]
    fn test_key_display_is_verbatim() {
        let key = AvatarKey::from("Jörg Müller");
        assert_eq!(key.to_string(), "Jörg Müller");
        assert_eq!(key.into_string(), "Jörg Müller");
    }
}
