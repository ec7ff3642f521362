//! Itinerary commands.
//!
//! - `itinerary` / `itinerary ls`: list saved destinations
//! - `itinerary remove <id>`: remove one destination
//! - `itinerary clear`: remove every destination

use serde_json::json;

use crate::app::open_store;
use crate::config::Config;
use crate::display::code;
use crate::error::Result;
use crate::views::{ItineraryPage, Page};

use super::{CommandOutput, warn_write_failure};

pub fn cmd_itinerary_ls(json: bool) -> Result<()> {
    let store = open_store(&Config::load()?);
    let page = Page::Itinerary(ItineraryPage::new(&store));
    CommandOutput::from(&page).print(json)
}

pub fn cmd_itinerary_remove(id: &str, json: bool) -> Result<()> {
    let store = open_store(&Config::load()?);
    let present = store.contains(id);

    if let Err(e) = store.remove(id) {
        warn_write_failure(&e);
    }

    let text = if present {
        format!("Removed {} from your itinerary", code(id))
    } else {
        format!("{} is not in your itinerary", code(id))
    };
    CommandOutput::new(json!({
        "action": "itinerary_remove",
        "id": id,
        "removed": present,
        "count": store.len(),
        "persisted": store.last_write_error().is_none(),
    }))
    .with_text(text)
    .print(json)
}

pub fn cmd_itinerary_clear(json: bool) -> Result<()> {
    let store = open_store(&Config::load()?);
    let removed = store.len();

    if let Err(e) = store.clear() {
        warn_write_failure(&e);
    }

    let text = match removed {
        0 => "Your itinerary is already empty".to_string(),
        1 => "Cleared 1 destination".to_string(),
        n => format!("Cleared {n} destinations"),
    };
    CommandOutput::new(json!({
        "action": "itinerary_clear",
        "removed": removed,
        "persisted": store.last_write_error().is_none(),
    }))
    .with_text(text)
    .print(json)
}
