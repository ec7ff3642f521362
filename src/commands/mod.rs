//! Command handlers for the `routewise` binary.

mod config;
mod explore;
mod itinerary;
mod open;
mod search;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use explore::cmd_explore;
pub use itinerary::{cmd_itinerary_clear, cmd_itinerary_ls, cmd_itinerary_remove};
pub use open::cmd_open;
pub use search::cmd_search;

use serde_json::Value;

use crate::error::Result;
use crate::views::{Page, View};

/// Print a JSON value, pretty-printed, to stdout.
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Output of a command in both JSON and human-readable form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print as JSON when requested, else the text form (JSON if no text).
    pub fn print(self, json: bool) -> Result<()> {
        match (json, self.text) {
            (false, Some(text)) => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

impl From<&Page> for CommandOutput {
    fn from(page: &Page) -> Self {
        CommandOutput::new(page.to_json()).with_text(page.render())
    }
}

/// Report a non-fatal store write failure on stderr.
pub(crate) fn warn_write_failure(err: &crate::error::RouteWiseError) {
    eprintln!(
        "{} {err}. The change is kept for this session only.",
        crate::display::failure("Warning: could not save your itinerary:")
    );
}
