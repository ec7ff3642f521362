use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::commands::{
    cmd_config_get, cmd_config_set, cmd_config_show, cmd_explore, cmd_itinerary_clear,
    cmd_itinerary_ls, cmd_itinerary_remove, cmd_open, cmd_search,
};
use crate::views::Tab;

#[derive(Parser)]
#[command(name = "routewise")]
#[command(about = "Plan trips from the terminal: destinations, flights, hotels and an itinerary")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a page by path (/, /destinations?search=..., /itinerary)
    Open {
        /// Page path
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search destinations by keyword
    #[command(visible_alias = "s")]
    Search {
        /// City or place name
        keyword: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show flights and hotels for a destination
    #[command(visible_alias = "x")]
    Explore {
        /// IATA city code (e.g. PAR)
        city_code: String,

        /// Save the destination to the itinerary
        #[arg(long)]
        save: bool,

        /// Tab to show
        #[arg(long, value_enum, default_value_t = Tab::Flights)]
        tab: Tab,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit the saved itinerary
    #[command(visible_alias = "it")]
    Itinerary {
        #[command(subcommand)]
        action: Option<ItineraryAction>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ItineraryAction {
    /// List saved destinations
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a destination by id
    #[command(visible_alias = "rm")]
    Remove {
        /// Saved destination id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every saved destination
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., travel.origin, api.client_id)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Dispatch the parsed command to its handler.
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Open { path, json } => cmd_open(&path, json).await,
            Commands::Search { keyword, json } => cmd_search(&keyword, json).await,
            Commands::Explore {
                city_code,
                save,
                tab,
                json,
            } => cmd_explore(&city_code, save, tab, json).await,

            Commands::Itinerary { action } => match action {
                None => cmd_itinerary_ls(false),
                Some(ItineraryAction::Ls { json }) => cmd_itinerary_ls(json),
                Some(ItineraryAction::Remove { id, json }) => cmd_itinerary_remove(&id, json),
                Some(ItineraryAction::Clear { json }) => cmd_itinerary_clear(json),
            },

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "routewise", &mut io::stdout());
}
