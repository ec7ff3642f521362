pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod itinerary;
pub mod paths;
pub mod router;
pub mod storage;
pub mod views;

pub use api::{AmadeusClient, ApiError, TravelApi};
pub use app::App;
pub use config::Config;
pub use error::{Result, RouteWiseError};
pub use itinerary::{Itinerary, ItineraryStore, SavedDestination, Subscription};
pub use router::{NavigationState, Navigator, Route};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use views::{Action, ActionKind, Page, Tab, View};
