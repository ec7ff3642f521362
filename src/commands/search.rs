use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::router::Route;

use super::CommandOutput;

/// Search destinations by keyword.
///
/// A blank keyword does not search; the empty search page is shown instead.
pub async fn cmd_search(keyword: &str, json: bool) -> Result<()> {
    let route = Route::search(keyword).unwrap_or(Route::Destinations { search: None });
    let mut app = App::from_config(Config::load()?)?;
    let page = app.open(route, None).await?;
    CommandOutput::from(&page).print(json)
}
