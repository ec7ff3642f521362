use jiff::civil::Date;
use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::api::{FlightOffer, Hotel, Location, TravelApi};
use crate::config::TravelConfig;
use crate::display::{
    accent, date_part, departure_date, format_duration, format_price, heading, muted, success,
};
use crate::error::Result;
use crate::itinerary::{ItineraryStore, SavedDestination};
use crate::router::{NavigationState, Route};

use super::{Action, ActionKind, Tab, View, actions_json, render_actions};

pub const NOT_FOUND_MESSAGE: &str = "Destination not found";
pub const NO_FLIGHTS_MESSAGE: &str = "No flights found for this destination";
pub const NO_HOTELS_MESSAGE: &str = "No hotels found for this destination";
pub const SAVE_LABEL: &str = "Save to Itinerary";
pub const SAVED_LABEL: &str = "Saved to Itinerary";

/// Flights and hotels for one destination.
#[derive(Debug, Clone)]
pub enum DetailsPage {
    /// Opened without a destination payload
    NotFound { city_code: String },
    Found(Box<DestinationDetails>),
}

#[derive(Debug, Clone)]
pub struct DestinationDetails {
    pub city_code: String,
    pub destination: Location,
    pub origin: String,
    pub departure_date: Date,
    pub flights: Vec<FlightOffer>,
    pub hotels: Vec<Hotel>,
    pub saved: bool,
    pub tab: Tab,
}

impl DetailsPage {
    /// Build the page for `city_code`.
    ///
    /// Without a navigation payload the page is the terminal not-found
    /// state and the API is not queried. Flight and hotel lookups run
    /// concurrently; a failure of either is logged and shown as an empty
    /// list.
    pub async fn load<A: TravelApi>(
        api: &A,
        store: &ItineraryStore,
        travel: &TravelConfig,
        city_code: &str,
        state: Option<&NavigationState>,
        tab: Tab,
        today: Date,
    ) -> Result<Self> {
        let Some(state) = state else {
            tracing::debug!(city_code, "destination page opened without payload");
            return Ok(Self::not_found(city_code));
        };

        let departure = departure_date(today, travel.departure_offset_days)?;
        let (flights, hotels) = tokio::join!(
            api.search_flights(&travel.origin, city_code, departure),
            api.search_hotels(city_code),
        );

        let flights = flights.unwrap_or_else(|e| {
            tracing::warn!(city_code, "flight search failed: {e}");
            Vec::new()
        });
        let mut hotels = hotels.unwrap_or_else(|e| {
            tracing::warn!(city_code, "hotel search failed: {e}");
            Vec::new()
        });
        hotels.truncate(travel.max_hotels);

        let mut details = DestinationDetails {
            city_code: city_code.to_string(),
            destination: state.destination.clone(),
            origin: travel.origin.clone(),
            departure_date: departure,
            flights,
            hotels,
            saved: false,
            tab,
        };
        details.saved = store.contains(&details.saved_id());
        Ok(Self::Found(Box::new(details)))
    }

    pub fn not_found(city_code: impl Into<String>) -> Self {
        Self::NotFound {
            city_code: city_code.into(),
        }
    }

    pub fn details(&self) -> Option<&DestinationDetails> {
        match self {
            Self::Found(details) => Some(details),
            Self::NotFound { .. } => None,
        }
    }

    pub fn details_mut(&mut self) -> Option<&mut DestinationDetails> {
        match self {
            Self::Found(details) => Some(details),
            Self::NotFound { .. } => None,
        }
    }

    fn city_code(&self) -> &str {
        match self {
            Self::NotFound { city_code } => city_code,
            Self::Found(details) => &details.city_code,
        }
    }
}

impl DestinationDetails {
    pub fn name(&self) -> &str {
        self.destination.name.as_deref().unwrap_or(&self.city_code)
    }

    /// Id the destination is saved under: its own id, else the city code.
    pub fn saved_id(&self) -> String {
        self.destination
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.city_code)
            .to_string()
    }

    pub fn saved_destination(&self) -> SavedDestination {
        let mut item = SavedDestination::new(self.saved_id()).with_city_code(&self.city_code);
        item.name = self.destination.name.clone();
        item.country = self.destination.country_name().map(str::to_string);
        item.city = self.destination.city_name().map(str::to_string);
        item
    }

    /// Add this destination to the itinerary.
    ///
    /// The save control reflects the store afterwards, including when the
    /// write failed but the entry is held in memory.
    pub fn save(&mut self, store: &ItineraryStore) -> Result<()> {
        let id = self.saved_id();
        let result = store.add(self.saved_destination());
        self.saved = store.contains(&id);
        result
    }

    fn location_line(&self) -> Option<String> {
        match (self.destination.city_name(), self.destination.country_name()) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }

    fn save_label(&self) -> &'static str {
        if self.saved { SAVED_LABEL } else { SAVE_LABEL }
    }

    fn render_flights(&self) -> String {
        if self.flights.is_empty() {
            return format!("{}\n", muted(NO_FLIGHTS_MESSAGE));
        }
        let rows: Vec<FlightRow> = self.flights.iter().map(FlightRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        format!(
            "Found {} available flights to {}\n{}\n",
            self.flights.len(),
            self.name(),
            table
        )
    }

    fn render_hotels(&self) -> String {
        if self.hotels.is_empty() {
            return format!("{}\n", muted(NO_HOTELS_MESSAGE));
        }
        let mut out = format!("Found {} hotels in {}\n", self.hotels.len(), self.name());
        for hotel in &self.hotels {
            let name = hotel.name.as_deref().unwrap_or("Unnamed hotel");
            let city = hotel
                .address
                .as_ref()
                .and_then(|a| a.city_name.as_deref())
                .unwrap_or(&self.city_code);
            out.push_str(&format!("  {}  {}", accent(name), muted(city)));
            if let Some(price) = format_price(hotel.price.as_ref()) {
                out.push_str(&format!("  {price}"));
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Tabled)]
struct FlightRow {
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Airline")]
    airline: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&FlightOffer> for FlightRow {
    fn from(offer: &FlightOffer) -> Self {
        Self {
            route: format!(
                "{} → {}",
                offer.departure_code().unwrap_or("?"),
                offer.arrival_code().unwrap_or("?")
            ),
            date: offer.departure_at().map(date_part).unwrap_or("-").to_string(),
            duration: offer.duration().map(format_duration).unwrap_or_else(|| "-".to_string()),
            airline: offer.airline().unwrap_or("-").to_string(),
            price: format_price(offer.price.as_ref()).unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl View for DetailsPage {
    fn route(&self) -> Route {
        Route::destination(self.city_code())
    }

    fn render(&self) -> String {
        let details = match self {
            Self::NotFound { .. } => {
                return format!(
                    "{}\n\n{}",
                    heading(NOT_FOUND_MESSAGE),
                    render_actions(&self.actions())
                );
            }
            Self::Found(details) => details,
        };

        let mut out = format!("{}\n", heading(details.name()));
        if let Some(line) = details.location_line() {
            out.push_str(&format!("{}\n", muted(&line)));
        }
        let control = if details.saved {
            success(&format!("✓ {SAVED_LABEL}"))
        } else {
            format!("+ {SAVE_LABEL}")
        };
        out.push_str(&format!("{control}\n\n"));

        let tabs = [Tab::Flights, Tab::Hotels]
            .iter()
            .map(|tab| {
                let label = match tab {
                    Tab::Flights => "✈ Flights",
                    Tab::Hotels => "🏨 Hotels",
                };
                if *tab == details.tab {
                    accent(&format!("[{label}]"))
                } else {
                    format!(" {label} ")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&format!("{tabs}\n"));
        out.push_str(&format!(
            "{}\n\n",
            muted(&format!(
                "{} → {} on {}",
                details.origin, details.city_code, details.departure_date
            ))
        ));

        match details.tab {
            Tab::Flights => out.push_str(&details.render_flights()),
            Tab::Hotels => out.push_str(&details.render_hotels()),
        }

        out.push('\n');
        out.push_str(&render_actions(&self.actions()));
        out
    }

    fn to_json(&self) -> Value {
        let details = match self {
            Self::NotFound { city_code } => {
                return json!({
                    "page": "destination",
                    "route": self.route().to_string(),
                    "status": "not_found",
                    "city_code": city_code,
                    "message": NOT_FOUND_MESSAGE,
                    "actions": actions_json(&self.actions()),
                });
            }
            Self::Found(details) => details,
        };
        json!({
            "page": "destination",
            "route": self.route().to_string(),
            "status": "found",
            "city_code": details.city_code,
            "destination": details.destination,
            "saved": details.saved,
            "save_label": details.save_label(),
            "tab": details.tab,
            "origin": details.origin,
            "departure_date": details.departure_date.to_string(),
            "flights": details.flights,
            "flights_message": details.flights.is_empty().then_some(NO_FLIGHTS_MESSAGE),
            "hotels": details.hotels,
            "hotels_message": details.hotels.is_empty().then_some(NO_HOTELS_MESSAGE),
            "actions": actions_json(&self.actions()),
        })
    }

    fn actions(&self) -> Vec<Action> {
        let details = match self {
            Self::NotFound { .. } => return vec![Action::navigate("Go Home", Route::Home)],
            Self::Found(details) => details,
        };

        let mut actions = vec![Action::new("Back", ActionKind::Back)];
        let save = Action::new(details.save_label(), ActionKind::SaveDestination);
        actions.push(if details.saved { save.disabled() } else { save });
        for tab in [Tab::Flights, Tab::Hotels] {
            let select = Action::new(format!("Show {tab}"), ActionKind::SelectTab { tab });
            actions.push(if tab == details.tab { select.disabled() } else { select });
        }
        if details.tab == Tab::Flights && !details.flights.is_empty() {
            actions.push(Action::new("Book Now", ActionKind::Inert));
        }
        actions
    }
}
