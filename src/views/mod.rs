//! Pages rendered to the terminal.
//!
//! Each page is built once from its inputs (route parameters, navigation
//! payload, itinerary store, travel API) and then rendered either as text
//! or as JSON. Pages hold no state of their own beyond that snapshot; the
//! actions they offer are carried out by [`crate::app::App`].

pub mod destinations;
pub mod details;
pub mod home;
pub mod itinerary;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::router::{NavigationState, Route};

pub use destinations::{DestinationsPage, SEARCH_FAILED_MESSAGE};
pub use details::{DestinationDetails, DetailsPage};
pub use home::HomePage;
pub use itinerary::ItineraryPage;

/// Tab shown on the destination details page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Flights,
    Hotels,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Flights => write!(f, "flights"),
            Tab::Hotels => write!(f, "hotels"),
        }
    }
}

/// What an action does when taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Navigate {
        route: Route,
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<NavigationState>,
    },
    Back,
    SaveDestination,
    RemoveDestination { id: String },
    ClearItinerary,
    SelectTab { tab: Tab },
    /// Shown but does nothing (booking)
    Inert,
}

/// A control a page offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub label: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl Action {
    pub fn new(label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            kind,
        }
    }

    pub fn navigate(label: impl Into<String>, route: Route) -> Self {
        Self::new(label, ActionKind::Navigate { route, state: None })
    }

    pub fn navigate_with(label: impl Into<String>, route: Route, state: NavigationState) -> Self {
        Self::new(
            label,
            ActionKind::Navigate {
                route,
                state: Some(state),
            },
        )
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Common surface of every page.
pub trait View {
    fn route(&self) -> Route;

    /// Human-readable terminal rendering
    fn render(&self) -> String;

    fn to_json(&self) -> Value;

    fn actions(&self) -> Vec<Action>;
}

/// Any page of the application.
#[derive(Debug, Clone)]
pub enum Page {
    Home(HomePage),
    Destinations(DestinationsPage),
    Details(DetailsPage),
    Itinerary(ItineraryPage),
}

impl Page {
    fn view(&self) -> &dyn View {
        match self {
            Page::Home(page) => page,
            Page::Destinations(page) => page,
            Page::Details(page) => page,
            Page::Itinerary(page) => page,
        }
    }

    /// First enabled action with `label`, ignoring case.
    pub fn find_action(&self, label: &str) -> Option<Action> {
        self.actions()
            .into_iter()
            .find(|a| a.enabled && a.label.eq_ignore_ascii_case(label))
    }
}

impl View for Page {
    fn route(&self) -> Route {
        self.view().route()
    }

    fn render(&self) -> String {
        self.view().render()
    }

    fn to_json(&self) -> Value {
        self.view().to_json()
    }

    fn actions(&self) -> Vec<Action> {
        self.view().actions()
    }
}

/// Actions as JSON, for embedding in page output.
pub(crate) fn actions_json(actions: &[Action]) -> Value {
    serde_json::to_value(actions).unwrap_or(Value::Null)
}

/// Render actions as a trailing hint block.
pub(crate) fn render_actions(actions: &[Action]) -> String {
    let labels: Vec<String> = actions
        .iter()
        .filter(|a| !matches!(a.kind, ActionKind::Inert))
        .map(|a| {
            if a.enabled {
                format!("[{}]", a.label)
            } else {
                crate::display::muted(&format!("[{}]", a.label))
            }
        })
        .collect();
    labels.join("  ")
}
