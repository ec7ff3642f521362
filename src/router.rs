//! Page routes, navigation payloads and history.

use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded;

use crate::api::Location;
use crate::error::{Result, RouteWiseError};

const ROUTE_BASE: &str = "http://routewise.local/";

/// A page address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Destinations { search: Option<String> },
    DestinationDetails { city_code: String },
    Itinerary,
}

impl Route {
    /// Parse a path such as `/destinations?search=rome`.
    ///
    /// Trailing slashes and unknown query parameters are ignored. A blank
    /// `search` parameter is treated as absent.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || RouteWiseError::InvalidRoute(path.to_string());

        let trimmed = path.trim();
        if !trimmed.starts_with('/') || trimmed.starts_with("//") {
            return Err(invalid());
        }
        let base = Url::parse(ROUTE_BASE).map_err(|_| invalid())?;
        let url = base.join(trimmed).map_err(|_| invalid())?;

        let segments: Vec<String> = url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(decode_segment)
                    .collect()
            })
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["destinations"] => {
                let search = url
                    .query_pairs()
                    .find(|(k, _)| k == "search")
                    .map(|(_, v)| v.into_owned())
                    .filter(|v| !v.trim().is_empty());
                Ok(Route::Destinations { search })
            }
            ["destination", code] if !code.trim().is_empty() => Ok(Route::DestinationDetails {
                city_code: (*code).to_string(),
            }),
            ["itinerary"] => Ok(Route::Itinerary),
            _ => Err(invalid()),
        }
    }

    /// Route for a submitted search box value; `None` when the query is blank.
    pub fn search(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Route::Destinations {
            search: Some(query.to_string()),
        })
    }

    pub fn destination(city_code: impl Into<String>) -> Self {
        Route::DestinationDetails {
            city_code: city_code.into(),
        }
    }

    /// Short page name used in logs and JSON output.
    pub fn page_name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Destinations { .. } => "destinations",
            Route::DestinationDetails { .. } => "destination",
            Route::Itinerary => "itinerary",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Destinations { search: None } => write!(f, "/destinations"),
            Route::Destinations {
                search: Some(query),
            } => {
                let encoded: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("search", query)
                    .finish();
                write!(f, "/destinations?{encoded}")
            }
            Route::DestinationDetails { city_code } => {
                write!(f, "/destination/{}", encode_segment(city_code))
            }
            Route::Itinerary => write!(f, "/itinerary"),
        }
    }
}

impl FromStr for Route {
    type Err = RouteWiseError;

    fn from_str(s: &str) -> Result<Self> {
        Route::parse(s)
    }
}

impl Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Route::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn encode_segment(segment: &str) -> String {
    let mut url = match Url::parse(ROUTE_BASE) {
        Ok(url) => url,
        Err(_) => return segment.to_string(),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// In-memory payload carried from one page to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub destination: Location,
}

impl NavigationState {
    pub fn new(destination: Location) -> Self {
        Self { destination }
    }
}

/// A visited page and the payload it was opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub route: Route,
    pub state: Option<NavigationState>,
}

/// Current page plus back history.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Visit,
    history: Vec<Visit>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Visit {
                route: Route::Home,
                state: None,
            },
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Visit {
        &self.current
    }

    pub fn route(&self) -> &Route {
        &self.current.route
    }

    pub fn state(&self) -> Option<&NavigationState> {
        self.current.state.as_ref()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn navigate(&mut self, route: Route, state: Option<NavigationState>) {
        tracing::debug!(%route, has_state = state.is_some(), "navigate");
        let previous = std::mem::replace(&mut self.current, Visit { route, state });
        self.history.push(previous);
    }

    /// Return to the previous page. Returns false when there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn home(&mut self) {
        self.navigate(Route::Home, None);
    }

    /// Navigate to the results page for `query`. Blank queries are ignored.
    pub fn submit_search(&mut self, query: &str) -> bool {
        match Route::search(query) {
            Some(route) => {
                self.navigate(route, None);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Home);
        assert_eq!(Route::parse("/itinerary/").unwrap(), Route::Itinerary);
        assert_eq!(
            Route::parse("/destinations").unwrap(),
            Route::Destinations { search: None }
        );
        assert_eq!(
            Route::parse("/destinations?search=new%20york&page=2").unwrap(),
            Route::Destinations {
                search: Some("new york".to_string())
            }
        );
        assert_eq!(
            Route::parse("/destination/PAR").unwrap(),
            Route::destination("PAR")
        );
    }

    #[test]
    fn test_path_segments_are_percent_decoded() {
        assert_eq!(
            Route::parse("/destination/S%C3%A3o%20Paulo").unwrap(),
            Route::destination("São Paulo")
        );
        // Malformed escapes are kept as written
        assert_eq!(
            Route::parse("/destination/A%zzB%4").unwrap(),
            Route::destination("A%zzB%4")
        );
    }

    #[test]
    fn test_blank_search_is_none() {
        assert_eq!(
            Route::parse("/destinations?search=%20%20").unwrap(),
            Route::Destinations { search: None }
        );
    }

    #[test]
    fn test_unknown_routes_are_rejected() {
        for path in ["/booking", "/destination", "/destination/PAR/extra", "itinerary", "//host/x"] {
            let err = Route::parse(path).unwrap_err();
            assert!(matches!(err, RouteWiseError::InvalidRoute(_)), "{path}");
        }
    }

    #[test]
    fn test_display_round_trips() {
        let routes = [
            Route::Home,
            Route::Itinerary,
            Route::Destinations { search: None },
            Route::Destinations {
                search: Some("São Paulo & more".to_string()),
            },
            Route::destination("PAR"),
            Route::destination("a b/c"),
        ];
        for route in routes {
            let text = route.to_string();
            assert_eq!(Route::parse(&text).unwrap(), route, "{text}");
        }
    }

    #[test]
    fn test_search_trims_and_ignores_blank() {
        assert_eq!(Route::search("   "), None);
        assert_eq!(
            Route::search("  rome ").unwrap().to_string(),
            "/destinations?search=rome"
        );
    }

    #[test]
    fn test_navigator_history() {
        let mut nav = Navigator::new();
        assert!(!nav.back());
        assert!(!nav.submit_search(" "));
        assert_eq!(nav.route(), &Route::Home);

        assert!(nav.submit_search("paris"));
        let location = Location {
            id: Some("CPAR".to_string()),
            name: Some("PARIS".to_string()),
            ..Default::default()
        };
        nav.navigate(Route::destination("PAR"), Some(NavigationState::new(location.clone())));
        assert_eq!(nav.state().unwrap().destination, location);

        assert!(nav.back());
        assert_eq!(
            nav.route(),
            &Route::Destinations {
                search: Some("paris".to_string())
            }
        );
        assert!(nav.state().is_none());

        nav.home();
        assert_eq!(nav.route(), &Route::Home);
        assert!(nav.can_go_back());
    }

    #[test]
    fn test_route_serializes_as_path() {
        let json = serde_json::to_string(&Route::destination("ROM")).unwrap();
        assert_eq!(json, "\"/destination/ROM\"");
        let parsed: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Route::destination("ROM"));
    }
}
