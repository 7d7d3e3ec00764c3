//! Newtype wrappers for sensitive configuration values.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// A Shopify Admin API access token.
///
/// The value is sent in the `X-Shopify-Access-Token` header and nowhere else.
/// Its `Debug` implementation masks the token so it cannot leak into logs.
///
/// # Example
///
/// ```rust
/// use shopify_http_client::AccessToken;
///
/// let token = AccessToken::new("shpat_secret");
/// assert_eq!(token.as_ref(), "shpat_secret");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string. The value is not validated.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns `true` if the token is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_is_masked() {
        let token = AccessToken::new("shpat_0123456789");
        let debug_output = format!("{token:?}");
        assert_eq!(debug_output, "AccessToken(*****)");
        assert!(!debug_output.contains("shpat"));
    }

    #[test]
    fn test_access_token_accepts_empty_value() {
        let token = AccessToken::new("");
        assert!(token.is_empty());
    }

    #[test]
    fn test_access_token_deserializes_from_string() {
        let token: AccessToken = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(token.as_ref(), "abc");
    }
}
