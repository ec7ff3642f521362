//! In-process fake of the travel API, serving canned Amadeus responses.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::oneshot;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";

/// Request log and failure switches shared with the handlers.
#[derive(Default)]
pub struct MockState {
    pub token_requests: AtomicUsize,
    pub location_queries: Mutex<Vec<HashMap<String, String>>>,
    pub flight_queries: Mutex<Vec<HashMap<String, String>>>,
    pub hotel_queries: Mutex<Vec<HashMap<String, String>>>,
    /// Answer every location search with a server error
    pub fail_locations: AtomicBool,
    /// Answer every flight search with a server error
    pub fail_flights: AtomicBool,
    /// Reject this many data requests with 401 before serving normally
    pub reject_data_requests: AtomicUsize,
    /// Answer this many data requests with 429 before serving normally
    pub rate_limit_requests: AtomicUsize,
}

pub struct MockTravelApi {
    addr: SocketAddr,
    pub state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

#[allow(dead_code)]
impl MockTravelApi {
    /// Start the server on an ephemeral port in a background thread.
    pub fn start() -> Self {
        Self::start_under("")
    }

    /// Start the server with every endpoint nested under `prefix`, as behind
    /// a gateway.
    pub fn start_under(prefix: &str) -> Self {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock API");
        listener
            .set_nonblocking(true)
            .expect("Failed to configure mock API listener");
        let addr = listener.local_addr().expect("Failed to read mock API address");

        let state = Arc::new(MockState::default());
        let app = if prefix.is_empty() {
            router(state.clone())
        } else {
            Router::new().nest(prefix, router(state.clone()))
        };
        let (tx, rx) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build mock API runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt mock API listener");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = rx.await;
                    })
                    .await
                    .expect("Mock API server failed");
            });
        });

        Self {
            addr,
            state,
            shutdown: Some(tx),
            thread: Some(thread),
        }
    }

    /// Server origin, without any prefix given to `start_under`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn flight_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.flight_queries.lock().unwrap().clone()
    }

    pub fn location_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.location_queries.lock().unwrap().clone()
    }

    pub fn hotel_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.hotel_queries.lock().unwrap().clone()
    }
}

impl Drop for MockTravelApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/v1/security/oauth2/token", post(token))
        .route("/v1/reference-data/locations", get(locations))
        .route("/v2/shopping/flight-offers", get(flight_offers))
        .route("/v1/reference-data/locations/hotels/by-city", get(hotels_by_city))
        .with_state(state)
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;

    let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_id").map(String::as_str) == Some(CLIENT_ID)
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET);
    if !valid {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_client",
                "error_description": "Client credentials are invalid",
                "code": 38187,
                "title": "Invalid parameters",
            })),
        )
            .into_response();
    }

    Json(json!({
        "type": "amadeusOAuth2Token",
        "username": "dev@example.com",
        "application_name": "routewise-tests",
        "client_id": CLIENT_ID,
        "token_type": "Bearer",
        "access_token": format!("token-{n}"),
        "expires_in": 1799,
        "state": "approved",
        "scope": "",
    }))
    .into_response()
}

/// Shared gate for data endpoints: auth header, forced 401s and 429s.
fn gate(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"));
    if !authorized {
        return Some(unauthorized("Missing or invalid access token"));
    }

    if take_one(&state.reject_data_requests) {
        return Some(unauthorized("The access token provided has expired"));
    }

    if take_one(&state.rate_limit_requests) {
        return Some(
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, "0")],
                Json(json!({
                    "errors": [{
                        "status": 429,
                        "code": 38194,
                        "title": "Too many requests",
                    }]
                })),
            )
                .into_response(),
        );
    }

    None
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn unauthorized(detail: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "errors": [{
                "status": 401,
                "code": 38192,
                "title": "Invalid access token",
                "detail": detail,
            }]
        })),
    )
        .into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "errors": [{
                "status": 500,
                "code": 141,
                "title": "SYSTEM ERROR HAS OCCURRED",
            }]
        })),
    )
        .into_response()
}

fn city(id: &str, name: &str, code: &str, country: &str, cc: &str, lat: f64, long: f64) -> Value {
    json!({
        "type": "location",
        "subType": "CITY",
        "id": id,
        "name": name,
        "iataCode": code,
        "address": {
            "cityName": name,
            "cityCode": code,
            "countryName": country,
            "countryCode": cc,
        },
        "geoCode": { "latitude": lat, "longitude": long },
    })
}

fn cities() -> Vec<Value> {
    vec![
        city("CPAR", "PARIS", "PAR", "FRANCE", "FR", 48.85341, 2.3488),
        city("CROM", "ROME", "ROM", "ITALY", "IT", 41.89193, 12.51133),
        city("CLON", "LONDON", "LON", "UNITED KINGDOM", "GB", 51.50853, -0.12574),
        // No city code: shown as a card but cannot be explored
        json!({ "type": "location", "subType": "CITY", "name": "PARISVILLE" }),
    ]
}

async fn locations(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = gate(&state, &headers) {
        return response;
    }
    state.location_queries.lock().unwrap().push(query.clone());
    if state.fail_locations.load(Ordering::SeqCst) {
        return server_error();
    }

    let keyword = query.get("keyword").cloned().unwrap_or_default().to_uppercase();
    let data: Vec<Value> = cities()
        .into_iter()
        .filter(|c| {
            c["name"]
                .as_str()
                .is_some_and(|name| !keyword.is_empty() && name.starts_with(&keyword))
        })
        .collect();

    Json(json!({ "meta": { "count": data.len() }, "data": data })).into_response()
}

async fn flight_offers(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = gate(&state, &headers) {
        return response;
    }
    state.flight_queries.lock().unwrap().push(query.clone());
    if state.fail_flights.load(Ordering::SeqCst) {
        return server_error();
    }

    let origin = query.get("originLocationCode").cloned().unwrap_or_default();
    let destination = query
        .get("destinationLocationCode")
        .cloned()
        .unwrap_or_default();
    let date = query.get("departureDate").cloned().unwrap_or_default();

    let offer = |id: &str, carrier: &str, duration: &str, total: &str| {
        json!({
            "type": "flight-offer",
            "id": id,
            "source": "GDS",
            "itineraries": [{
                "duration": duration,
                "segments": [{
                    "departure": { "iataCode": origin, "at": format!("{date}T08:15:00") },
                    "arrival": { "iataCode": destination, "at": format!("{date}T10:45:00") },
                    "carrierCode": carrier,
                    "number": "1234",
                }]
            }],
            "price": { "currency": "EUR", "total": total, "grandTotal": total },
            "validatingAirlineCodes": [carrier],
        })
    };

    Json(json!({
        "meta": { "count": 2 },
        "data": [
            offer("1", "AF", "PT2H30M", "129.40"),
            offer("2", "BA", "PT1H5M", "87.10"),
        ]
    }))
    .into_response()
}

async fn hotels_by_city(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = gate(&state, &headers) {
        return response;
    }
    state.hotel_queries.lock().unwrap().push(query.clone());

    let city_code = query.get("cityCode").cloned().unwrap_or_default();
    let data: Vec<Value> = (1..=8)
        .map(|i| {
            json!({
                "chainCode": "RW",
                "iataCode": city_code,
                "dupeId": 700000 + i,
                "name": format!("HOTEL {city_code} {i}"),
                "hotelId": format!("RW{city_code}{i:03}"),
                "address": { "cityName": city_code, "countryCode": "FR" },
            })
        })
        .collect();

    Json(json!({ "data": data })).into_response()
}
