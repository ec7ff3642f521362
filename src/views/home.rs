use serde::Serialize;
use serde_json::{Value, json};

use crate::display::{accent, heading, muted, stars};
use crate::router::Route;

use super::{Action, View, actions_json, render_actions};

pub const HERO_TITLE: &str = "Your Adventure Starts with RouteWise";
pub const SEARCH_PROMPT: &str = "Where do you want to go?";

const HERO_EYEBROW: &str = "Plan Your Next Move";
const HERO_TAGLINE: &str = "Turning every destination into an experience worth remembering, \
guiding you confidently from where you are to where you dream to be";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopVisited {
    pub city: &'static str,
    pub country: &'static str,
    pub description: &'static str,
    pub rating: u8,
}

pub const TOP_VISITED: &[TopVisited] = &[
    TopVisited {
        city: "Rome",
        country: "Italy",
        description: "Home to St. Peter's Basilica, the Vatican Museums.",
        rating: 5,
    },
    TopVisited {
        city: "Paris",
        country: "France",
        description: "Known for romance, art, fashion and architecture.",
        rating: 4,
    },
    TopVisited {
        city: "England",
        country: "UK",
        description: "Rich in history, royal traditions, literature, influence.",
        rating: 4,
    },
];

/// Landing page: hero, search prompt and the top-visited cards.
#[derive(Debug, Clone, Default)]
pub struct HomePage;

impl HomePage {
    pub fn new() -> Self {
        HomePage
    }
}

impl View for HomePage {
    fn route(&self) -> Route {
        Route::Home
    }

    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", muted(HERO_EYEBROW)));
        out.push_str(&format!("{}\n", heading(HERO_TITLE)));
        out.push_str(&format!("{HERO_TAGLINE}\n\n"));

        out.push_str(&format!("{}\n", heading(SEARCH_PROMPT)));
        out.push_str(&format!(
            "  {}\n\n",
            muted("routewise search <destination>   e.g. Paris, Rome...")
        ));

        out.push_str(&format!("{}\n", heading("Top Visited")));
        out.push_str(&format!(
            "{}\n",
            muted("Explore the most visited and toured countries around the world")
        ));
        for place in TOP_VISITED {
            out.push_str(&format!(
                "\n  {} {}  {}\n",
                accent(place.city),
                muted(place.country),
                stars(place.rating)
            ));
            out.push_str(&format!("  {}\n", place.description));
        }

        out.push('\n');
        out.push_str(&render_actions(&self.actions()));
        out
    }

    fn to_json(&self) -> Value {
        json!({
            "page": "home",
            "route": self.route().to_string(),
            "title": HERO_TITLE,
            "prompt": SEARCH_PROMPT,
            "top_visited": TOP_VISITED,
            "actions": actions_json(&self.actions()),
        })
    }

    fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = TOP_VISITED
            .iter()
            .filter_map(|place| {
                Route::search(place.city)
                    .map(|route| Action::navigate(format!("Explore {}", place.city), route))
            })
            .collect();
        actions.push(Action::navigate("My Itinerary", Route::Itinerary));
        actions
    }
}
