use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::api::Location;
use crate::api::types::Address;
use crate::display::{heading, initial, muted};
use crate::itinerary::{Itinerary, ItineraryStore, SavedDestination};
use crate::router::{NavigationState, Route};

use super::{Action, ActionKind, View, actions_json, render_actions};

pub const EMPTY_MESSAGE: &str = "Your itinerary is empty";
const EMPTY_HINT: &str = "Search for destinations and save them here";

/// "You have N destination(s) saved"
pub fn count_line(count: usize) -> String {
    let noun = if count > 1 { "destinations" } else { "destination" };
    format!("You have {count} {noun} saved")
}

/// Navigation payload rebuilt from a saved record, for "View Details".
pub fn view_details_state(item: &SavedDestination) -> NavigationState {
    NavigationState::new(Location {
        id: Some(item.id.clone()),
        name: item.name.clone(),
        address: Some(Address {
            city_name: item.city.clone(),
            city_code: item.city_code.clone(),
            country_name: item.country.clone(),
            country_code: None,
        }),
        ..Default::default()
    })
}

/// Route for an entry's details page: its city code, else its id.
pub fn details_route(item: &SavedDestination) -> Route {
    Route::destination(item.city_code.as_deref().unwrap_or(&item.id))
}

/// Saved destinations.
#[derive(Debug, Clone)]
pub struct ItineraryPage {
    itinerary: Itinerary,
}

impl ItineraryPage {
    pub fn new(store: &ItineraryStore) -> Self {
        Self::from_itinerary(store.current_itinerary())
    }

    pub fn from_itinerary(itinerary: Itinerary) -> Self {
        Self { itinerary }
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "")]
    badge: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "City code")]
    city_code: String,
}

impl From<&SavedDestination> for EntryRow {
    fn from(item: &SavedDestination) -> Self {
        let location = [item.city.as_deref(), item.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            badge: initial(item.display_name()),
            id: item.id.clone(),
            name: item.display_name().to_string(),
            location,
            city_code: item.city_code.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl View for ItineraryPage {
    fn route(&self) -> Route {
        Route::Itinerary
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n\n", heading("My Itinerary"));
        if self.itinerary.is_empty() {
            out.push_str(&format!("{EMPTY_MESSAGE}\n{}\n\n", muted(EMPTY_HINT)));
            out.push_str(&render_actions(&self.actions()));
            return out;
        }

        out.push_str(&format!("{}\n", count_line(self.itinerary.len())));
        let rows: Vec<EntryRow> = self.itinerary.iter().map(EntryRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        out.push_str(&format!("{table}\n\n"));
        out.push_str(&format!(
            "{}\n",
            muted("routewise explore <city code>   routewise itinerary remove <id>   routewise itinerary clear")
        ));
        out
    }

    fn to_json(&self) -> Value {
        let message = if self.itinerary.is_empty() {
            EMPTY_MESSAGE.to_string()
        } else {
            count_line(self.itinerary.len())
        };
        json!({
            "page": "itinerary",
            "route": self.route().to_string(),
            "count": self.itinerary.len(),
            "message": message,
            "destinations": self.itinerary,
            "actions": actions_json(&self.actions()),
        })
    }

    fn actions(&self) -> Vec<Action> {
        if self.itinerary.is_empty() {
            return vec![Action::navigate("Explore Destinations", Route::Home)];
        }

        let mut actions = Vec::new();
        for item in &self.itinerary {
            actions.push(Action::navigate_with(
                format!("View Details {}", item.id),
                details_route(item),
                view_details_state(item),
            ));
            actions.push(Action::new(
                format!("Remove {}", item.id),
                ActionKind::RemoveDestination {
                    id: item.id.clone(),
                },
            ));
        }
        actions.push(Action::new("Clear All", ActionKind::ClearItinerary));
        actions
    }
}
