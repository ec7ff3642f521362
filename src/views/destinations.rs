use serde_json::{Value, json};

use crate::api::{Location, TravelApi};
use crate::display::{accent, code, failure, heading, initial, muted};
use crate::router::{NavigationState, Route};

use super::{Action, View, actions_json, render_actions};

pub const SEARCH_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";
const NO_RESULTS_HINT: &str = "Try searching for another city or country";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No query given: only the search prompt is shown
    Idle,
    Failed,
    Results(Vec<Location>),
}

/// Destination search results.
#[derive(Debug, Clone)]
pub struct DestinationsPage {
    query: Option<String>,
    outcome: SearchOutcome,
}

impl DestinationsPage {
    /// Run the search for `query`, if any.
    ///
    /// API failures are logged and shown as a single error message.
    pub async fn load<A: TravelApi>(api: &A, query: Option<&str>) -> Self {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let Some(query) = query else {
            return Self {
                query: None,
                outcome: SearchOutcome::Idle,
            };
        };

        let outcome = match api.search_destinations(query).await {
            Ok(results) => {
                tracing::debug!(query, results = results.len(), "destination search");
                SearchOutcome::Results(results)
            }
            Err(e) => {
                tracing::warn!(query, "destination search failed: {e}");
                SearchOutcome::Failed
            }
        };
        Self {
            query: Some(query.to_string()),
            outcome,
        }
    }

    pub fn from_parts(query: Option<String>, outcome: SearchOutcome) -> Self {
        Self { query, outcome }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn results(&self) -> &[Location] {
        match &self.outcome {
            SearchOutcome::Results(results) => results,
            _ => &[],
        }
    }

    fn status(&self) -> &'static str {
        match &self.outcome {
            SearchOutcome::Idle => "idle",
            SearchOutcome::Failed => "error",
            SearchOutcome::Results(results) if results.is_empty() => "empty",
            SearchOutcome::Results(_) => "ok",
        }
    }

    fn empty_message(&self) -> String {
        format!(
            "No destinations found for \"{}\"",
            self.query.as_deref().unwrap_or_default()
        )
    }
}

/// Explore action for a result card; `None` when the location has no city code.
fn explore_action(location: &Location) -> Option<Action> {
    let city_code = location.city_code()?;
    let label = format!("Explore {}", location.name.as_deref().unwrap_or(city_code));
    Some(Action::navigate_with(
        label,
        Route::destination(city_code),
        NavigationState::new(location.clone()),
    ))
}

fn render_card(location: &Location) -> String {
    let name = location.name.as_deref().unwrap_or("Unknown");
    let mut card = format!("  {}  {}", code(&initial(name)), accent(name));
    if let Some(country) = location.country_name() {
        card.push_str(&format!("  {}", muted(country)));
    }
    card.push('\n');

    let city = location.city_name().unwrap_or(name);
    match location.country_code() {
        Some(cc) => card.push_str(&format!("     {city}, {cc}\n")),
        None => card.push_str(&format!("     {city}\n")),
    }
    if let Some(geo) = location.geo_code {
        card.push_str(&format!(
            "     {}\n",
            muted(&format!("{:.4}, {:.4}", geo.latitude, geo.longitude))
        ));
    }
    if let Some(city_code) = location.city_code() {
        card.push_str(&format!(
            "     {}\n",
            muted(&format!("routewise explore {city_code}"))
        ));
    }
    card
}

impl View for DestinationsPage {
    fn route(&self) -> Route {
        Route::Destinations {
            search: self.query.clone(),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n", heading("Find Your Next Destination"));
        match &self.outcome {
            SearchOutcome::Idle => {
                out.push_str(&format!(
                    "{}\n",
                    muted("Search destinations e.g. Paris, Rome...")
                ));
            }
            SearchOutcome::Failed => {
                out.push_str(&format!("\n{}\n", failure(SEARCH_FAILED_MESSAGE)));
            }
            SearchOutcome::Results(results) if results.is_empty() => {
                out.push_str(&format!("\n{}\n", self.empty_message()));
                out.push_str(&format!("{}\n", muted(NO_RESULTS_HINT)));
            }
            SearchOutcome::Results(results) => {
                out.push_str(&format!(
                    "\nResults for \"{}\" ({})\n\n",
                    self.query.as_deref().unwrap_or_default(),
                    results.len()
                ));
                for location in results {
                    out.push_str(&render_card(location));
                    out.push('\n');
                }
            }
        }
        let actions = render_actions(&self.actions());
        if !actions.is_empty() {
            out.push('\n');
            out.push_str(&actions);
        }
        out
    }

    fn to_json(&self) -> Value {
        let message = match &self.outcome {
            SearchOutcome::Failed => Some(SEARCH_FAILED_MESSAGE.to_string()),
            SearchOutcome::Results(results) if results.is_empty() => Some(self.empty_message()),
            _ => None,
        };
        json!({
            "page": "destinations",
            "route": self.route().to_string(),
            "query": self.query,
            "status": self.status(),
            "message": message,
            "results": self.results(),
            "actions": actions_json(&self.actions()),
        })
    }

    fn actions(&self) -> Vec<Action> {
        self.results().iter().filter_map(explore_action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Address, GeoCode};
    use crate::views::ActionKind;

    fn paris() -> Location {
        Location {
            id: Some("CPAR".to_string()),
            name: Some("PARIS".to_string()),
            iata_code: Some("PAR".to_string()),
            address: Some(Address {
                city_name: Some("PARIS".to_string()),
                city_code: Some("PAR".to_string()),
                country_name: Some("FRANCE".to_string()),
                country_code: Some("FR".to_string()),
            }),
            geo_code: Some(GeoCode {
                latitude: 48.85341,
                longitude: 2.3488,
            }),
        }
    }

    #[test]
    fn test_failed_search_shows_generic_message() {
        let page = DestinationsPage::from_parts(Some("rome".to_string()), SearchOutcome::Failed);
        assert!(page.render().contains(SEARCH_FAILED_MESSAGE));
        assert_eq!(page.to_json()["status"], "error");
        assert!(page.actions().is_empty());
    }

    #[test]
    fn test_empty_results() {
        let page = DestinationsPage::from_parts(
            Some("zzz".to_string()),
            SearchOutcome::Results(Vec::new()),
        );
        let text = page.render();
        assert!(text.contains("No destinations found for \"zzz\""));
        assert!(text.contains(NO_RESULTS_HINT));
        assert_eq!(page.to_json()["message"], "No destinations found for \"zzz\"");
    }

    #[test]
    fn test_result_card_and_explore_payload() {
        let page = DestinationsPage::from_parts(
            Some("paris".to_string()),
            SearchOutcome::Results(vec![paris()]),
        );
        let text = page.render();
        assert!(text.contains("PARIS, FR"));
        assert!(text.contains("48.8534"));

        let actions = page.actions();
        assert_eq!(actions.len(), 1);
        let ActionKind::Navigate { route, state } = &actions[0].kind else {
            panic!("explore should navigate");
        };
        assert_eq!(route, &Route::destination("PAR"));
        assert_eq!(state.as_ref().unwrap().destination, paris());
    }

    #[test]
    fn test_location_without_city_code_has_no_explore() {
        let location = Location {
            name: Some("Somewhere".to_string()),
            ..Default::default()
        };
        let page = DestinationsPage::from_parts(
            Some("some".to_string()),
            SearchOutcome::Results(vec![location]),
        );
        assert!(page.actions().is_empty());
        assert!(page.render().contains("Somewhere"));
    }

    #[test]
    fn test_idle_page_route() {
        let page = DestinationsPage::from_parts(None, SearchOutcome::Idle);
        assert_eq!(page.route(), Route::Destinations { search: None });
        assert_eq!(page.to_json()["status"], "idle");
    }
}
