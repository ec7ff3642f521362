//! HTTP client for the Amadeus self-service travel API.
//!
//! Requests authenticate with a bearer token obtained through the OAuth2
//! client-credentials grant. The token is cached until shortly before it
//! expires; a `401` on a data request drops the cached token and the request
//! is retried once with a fresh one.

use std::time::Duration;

use jiff::civil::Date;
use reqwest::header;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

use crate::config::Config;
use crate::error::{Result, RouteWiseError};

use super::auth::{AccessToken, RedactedHeader};
use super::error::ApiError;
use super::types::{DataEnvelope, FlightOffer, Hotel, Location, TokenResponse};
use super::{DEFAULT_RETRY_BASE_DELAY, TravelApi, execute_with_retry};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const LOCATIONS_PATH: &str = "/v1/reference-data/locations";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
const HOTELS_BY_CITY_PATH: &str = "/v1/reference-data/locations/hotels/by-city";

struct Credentials {
    client_id: SecretBox<String>,
    client_secret: SecretBox<String>,
}

pub struct AmadeusClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
    token: Mutex<Option<AccessToken>>,
    max_flight_offers: u32,
    retry_base_delay: Duration,
}

impl AmadeusClient {
    /// Build a client from configuration and environment overrides.
    ///
    /// Missing credentials are not an error here; each request fails with
    /// [`RouteWiseError::Auth`] instead, so pages that tolerate API failures
    /// still render.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = parse_base_url(&config.api_base_url())?;
        let credentials = match (config.client_id(), config.client_secret()) {
            (Some(id), Some(secret)) => Some(Credentials {
                client_id: SecretBox::new(Box::new(id)),
                client_secret: SecretBox::new(Box::new(secret)),
            }),
            _ => None,
        };

        let timeout = config.api_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
            token: Mutex::new(None),
            max_flight_offers: config.travel.max_flight_offers,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        })
    }

    /// Override the backoff base delay between retried attempts
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Authorization header for the current token, fetching a new token if
    /// none is cached or the cached one is about to expire.
    async fn authorization(&self) -> std::result::Result<RedactedHeader, ApiError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_fresh()
        {
            return Ok(token.bearer_header());
        }

        let token = self.request_token().await?;
        let bearer = token.bearer_header();
        *cached = Some(token);
        Ok(bearer)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn request_token(&self) -> std::result::Result<AccessToken, ApiError> {
        let Some(credentials) = &self.credentials else {
            return Err(ApiError::with_status(
                "credentials not configured. Set AMADEUS_API_KEY and AMADEUS_API_SECRET, \
                 or run: routewise config set api.client_id <id>",
                reqwest::StatusCode::UNAUTHORIZED,
            ));
        };
        let url = self.endpoint(TOKEN_PATH, &[])?;

        let response = execute_with_retry(self.retry_base_delay, || async {
            let form = [
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.expose_secret().as_str()),
                (
                    "client_secret",
                    credentials.client_secret.expose_secret().as_str(),
                ),
            ];
            let response = self.client.post(url.clone()).form(&form).send().await?;
            check_status(response).await
        })
        .await?;

        let body: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = ?body.expires_in, "obtained travel API access token");
        Ok(AccessToken::new(body.access_token, body.expires_in))
    }

    /// GET a `{"data": [...]}` resource with authentication and retries.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.endpoint(path, query)?;
        let mut refreshed = false;

        loop {
            let auth = self.authorization().await?;
            let result = execute_with_retry(self.retry_base_delay, || async {
                let response = self
                    .client
                    .get(url.clone())
                    .header(header::AUTHORIZATION, auth.as_header_value()?)
                    .header(header::ACCEPT, "application/json")
                    .send()
                    .await?;
                check_status(response).await
            })
            .await;

            match result {
                Ok(response) => {
                    let envelope: DataEnvelope<T> = response
                        .json()
                        .await
                        .map_err(|e| RouteWiseError::Api(format!("unexpected response: {e}")))?;
                    return Ok(envelope.data);
                }
                Err(err) if err.is_unauthorized() && !refreshed => {
                    tracing::debug!("access token rejected, refreshing");
                    self.invalidate_token().await;
                    refreshed = true;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> std::result::Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::new(format!("invalid endpoint {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for AmadeusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials.as_ref().map(|_| "[REDACTED]"))
            .field("max_flight_offers", &self.max_flight_offers)
            .finish()
    }
}

impl TravelApi for AmadeusClient {
    async fn search_destinations(&self, keyword: &str) -> Result<Vec<Location>> {
        self.get_data(LOCATIONS_PATH, &[("keyword", keyword), ("subType", "CITY")])
            .await
    }

    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: Date,
    ) -> Result<Vec<FlightOffer>> {
        let date = departure_date.to_string();
        let max = self.max_flight_offers.to_string();
        self.get_data(
            FLIGHT_OFFERS_PATH,
            &[
                ("originLocationCode", origin),
                ("destinationLocationCode", destination),
                ("departureDate", &date),
                ("adults", "1"),
                ("max", &max),
            ],
        )
        .await
    }

    async fn search_hotels(&self, city_code: &str) -> Result<Vec<Hotel>> {
        self.get_data(HOTELS_BY_CITY_PATH, &[("cityCode", city_code)])
            .await
    }
}

/// Turn a non-success response into an [`ApiError`] carrying its status,
/// `Retry-After` hint and error body message.
async fn check_status(response: Response) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response_body(status, retry_after, &body))
}

/// Parse the base URL so that it always ends in `/` and endpoint paths
/// join under any path prefix it carries.
fn parse_base_url(raw: &str) -> Result<Url> {
    let with_slash = format!("{}/", raw.trim().trim_end_matches('/'));
    let url = Url::parse(&with_slash)
        .map_err(|e| RouteWiseError::Config(format!("invalid API base URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(RouteWiseError::Config(format!(
            "invalid API base URL '{raw}': not a hierarchical URL"
        )));
    }
    Ok(url)
}
