//! Error handling for travel API calls.
//!
//! Failures are first captured as [`ApiError`], which keeps the HTTP status
//! and `Retry-After` hint needed by the retry loop, and are converted into
//! crate errors once retrying is over.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::RouteWiseError;

/// Longest server-requested delay honored between attempts.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if a response was received
    pub status: Option<reqwest::StatusCode>,
    /// Retry-After header value in seconds, if available
    pub retry_after: Option<u64>,
    /// Human-readable error message
    pub message: String,
    /// Connection-level failure (timeout, refused, reset)
    pub network: bool,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            retry_after: None,
            message: message.into(),
            network: false,
        }
    }

    pub fn with_status(message: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::new(message)
        }
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(reqwest::StatusCode::UNAUTHORIZED)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(reqwest::StatusCode::TOO_MANY_REQUESTS)
    }

    /// Server errors and connection failures are worth retrying.
    pub fn is_transient(&self) -> bool {
        self.network || self.status.is_some_and(|s| s.is_server_error())
    }

    /// Delay before attempt `attempt + 1`, given exponential `base`.
    pub fn retry_delay(&self, attempt: u32, base: Duration) -> Duration {
        if let Some(seconds) = self.retry_after {
            return Duration::from_secs(seconds).min(MAX_RETRY_AFTER);
        }
        base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Build an error from a non-success response body.
    ///
    /// The API reports failures as `{"errors":[{"title":..,"detail":..}]}`;
    /// the first entry's detail (or title) becomes the message.
    pub fn from_response_body(
        status: reqwest::StatusCode,
        retry_after: Option<u64>,
        body: &str,
    ) -> Self {
        let described = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.errors.into_iter().next())
            .and_then(|e| e.detail.or(e.title))
            .or_else(|| {
                serde_json::from_str::<OAuthErrorBody>(body)
                    .ok()
                    .and_then(|b| b.error_description.or(b.error))
            });
        let message = match described {
            Some(text) => format!("HTTP {}: {}", status.as_u16(), text),
            None => format!("HTTP {status}"),
        };
        let error = Self::with_status(message, status);
        match retry_after {
            Some(seconds) => error.with_retry_after(seconds),
            None => error,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    title: Option<String>,
    detail: Option<String>,
}

#[derive(Deserialize)]
struct OAuthErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status(),
            retry_after: None,
            network: err.is_timeout() || err.is_connect() || err.is_request(),
            message: err.to_string(),
        }
    }
}

impl From<ApiError> for RouteWiseError {
    fn from(err: ApiError) -> Self {
        if err.is_rate_limited() {
            return RouteWiseError::RateLimited(err.retry_after.unwrap_or(60));
        }
        match err.status.map(|s| s.as_u16()) {
            Some(401) | Some(403) => RouteWiseError::Auth(format!("travel API: {}", err.message)),
            _ => RouteWiseError::Api(format!("travel API: {}", err.message)),
        }
    }
}
