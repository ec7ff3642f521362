//! Travel API access: destination search, flight offers and hotel listings.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

use std::future::Future;
use std::time::Duration;

use jiff::civil::Date;

use crate::error::Result;

pub use client::AmadeusClient;
pub use error::ApiError;
pub use types::{FlightOffer, Hotel, Location};

/// Attempts made for a single request before the error is surfaced.
pub const MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff between attempts.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Common interface for travel data providers
pub trait TravelApi: Send + Sync {
    /// Cities matching a free-text keyword
    fn search_destinations(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<Location>>> + Send;

    /// Priced flight offers from `origin` to `destination` on `departure_date`
    fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: Date,
    ) -> impl Future<Output = Result<Vec<FlightOffer>>> + Send;

    /// Hotels listed for a city code
    fn search_hotels(&self, city_code: &str) -> impl Future<Output = Result<Vec<Hotel>>> + Send;
}

/// Run `operation` until it succeeds, fails permanently, or runs out of attempts.
///
/// Rate-limited and transient failures are retried with exponential backoff,
/// honoring the server's `Retry-After` when present.
pub async fn execute_with_retry<T, F, Fut>(
    base_delay: Duration,
    mut operation: F,
) -> std::result::Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, ApiError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err)
                if attempt < MAX_ATTEMPTS && (err.is_transient() || err.is_rate_limited()) =>
            {
                let delay = err.retry_delay(attempt, base_delay);
                tracing::debug!(attempt, ?delay, error = %err, "retrying travel API request");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
