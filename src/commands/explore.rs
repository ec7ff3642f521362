use crate::app::App;
use crate::config::Config;
use crate::error::{Result, RouteWiseError};
use crate::router::Route;
use crate::views::{Action, ActionKind, Tab};

use super::{CommandOutput, warn_write_failure};

/// Open the details page for a city code, optionally saving it.
pub async fn cmd_explore(city_code: &str, save: bool, tab: Tab, json: bool) -> Result<()> {
    let city_code = city_code.trim().to_uppercase();
    if city_code.is_empty() {
        return Err(RouteWiseError::Other(
            "city code cannot be empty".to_string(),
        ));
    }

    let mut app = App::from_config(Config::load()?)?;
    let state = app.resolve_destination(&city_code).await;
    if state.is_none() {
        tracing::info!(city_code, "no destination found for city code");
    }
    let mut page = app.open(Route::destination(&city_code), state).await?;

    if tab != Tab::default() {
        let select = Action::new(format!("Show {tab}"), ActionKind::SelectTab { tab });
        page = app.perform(&mut page, &select).await?;
    }

    if save {
        match page.find_action("Save to Itinerary") {
            Some(action) => {
                if let Err(e) = app.perform(&mut page, &action).await {
                    warn_write_failure(&e);
                }
            }
            None if page.find_action("Go Home").is_some() => {
                return Err(RouteWiseError::Other(format!(
                    "cannot save '{city_code}': destination not found"
                )));
            }
            None => tracing::debug!(city_code, "destination already saved"),
        }
    }

    CommandOutput::from(&page).print(json)
}
