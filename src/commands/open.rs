use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::router::Route;

use super::CommandOutput;

/// Open a page by path, e.g. `/destinations?search=rome`.
///
/// Paths carry no navigation payload, so `/destination/<code>` opened this
/// way renders the not-found page; use `explore` to open a destination.
pub async fn cmd_open(path: &str, json: bool) -> Result<()> {
    let route = Route::parse(path)?;
    let mut app = App::from_config(Config::load()?)?;
    let page = app.open(route, None).await?;
    CommandOutput::from(&page).print(json)
}
