//! Access-token handling for the client-credentials flow.
//!
//! # Security Note - Logging
//!
//! The bearer token is held in a [`SecretBox`] and only exposed while the
//! `Authorization` header is built. The header itself is wrapped in
//! [`RedactedHeader`], whose `Display` and `Debug` print `[REDACTED]`.
//! Avoid `RUST_LOG=reqwest=debug` in production all the same.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretBox};

use super::error::ApiError;

/// Tokens are refreshed this long before they actually expire.
pub const REFRESH_SKEW: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token response carries no `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(1799);

/// A bearer token and the instant it stops being valid.
pub struct AccessToken {
    value: SecretBox<String>,
    expires_at: Instant,
}

impl AccessToken {
    pub fn new(value: String, expires_in: Option<u64>) -> Self {
        let lifetime = expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        Self {
            value: SecretBox::new(Box::new(value)),
            expires_at: Instant::now() + lifetime,
        }
    }

    /// Whether the token can still be used at `now` without refreshing.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now + REFRESH_SKEW < self.expires_at
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Instant::now())
    }

    pub fn bearer_header(&self) -> RedactedHeader {
        RedactedHeader::new(format!("Bearer {}", self.value.expose_secret()))
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Wrapper for sensitive header values that redacts the value when formatted.
pub struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    pub fn new(value: String) -> Self {
        Self { value }
    }

    pub fn as_header_value(&self) -> Result<HeaderValue, ApiError> {
        let mut header = HeaderValue::from_str(&self.value)
            .map_err(|_| ApiError::new("access token contains invalid header characters"))?;
        header.set_sensitive(true);
        Ok(header)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_header_display() {
        let header = RedactedHeader::new("Bearer secret-token-12345".to_string());
        assert_eq!(format!("{header}"), "[REDACTED]");
        assert!(!format!("{header:?}").contains("secret-token"));
    }

    #[test]
    fn test_header_value_is_sensitive() {
        let token = AccessToken::new("abc123".to_string(), Some(1799));
        let value = token.bearer_header().as_header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_freshness_window() {
        let token = AccessToken::new("t".to_string(), Some(120));
        let now = Instant::now();
        assert!(token.is_fresh_at(now));
        assert!(!token.is_fresh_at(now + Duration::from_secs(61)));
    }

    #[test]
    fn test_short_lived_token_is_never_fresh() {
        let token = AccessToken::new("t".to_string(), Some(30));
        assert!(!token.is_fresh());
    }

    #[test]
    fn test_debug_hides_token() {
        let token = AccessToken::new("very-secret".to_string(), None);
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
