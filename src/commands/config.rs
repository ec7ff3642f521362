//! Configuration commands for managing RouteWise settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{Config, is_sensitive_key, mask_sensitive_value};
use crate::error::{Result, RouteWiseError};

fn status_text(configured: bool) -> String {
    if configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;

    let client_id_configured = config.client_id().is_some();
    let client_secret_configured = config.client_secret().is_some();

    let json_output = json!({
        "api": {
            "base_url": config.api_base_url(),
            "timeout": config.api.timeout,
            "client_id_configured": client_id_configured,
            "client_secret_configured": client_secret_configured,
        },
        "travel": {
            "origin": config.travel.origin,
            "departure_offset_days": config.travel.departure_offset_days,
            "max_flight_offers": config.travel.max_flight_offers,
            "max_hotels": config.travel.max_hotels,
        },
        "storage": {
            "itinerary_key": config.storage.itinerary_key,
            "capacity_bytes": config.storage.capacity_bytes,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!("  base_url: {}\n", config.api_base_url()));
    text_output.push_str(&format!("  timeout: {}s\n", config.api.timeout));
    text_output.push_str(&format!(
        "  client_id: {}\n",
        status_text(client_id_configured)
    ));
    text_output.push_str(&format!(
        "  client_secret: {}\n",
        status_text(client_secret_configured)
    ));
    text_output.push('\n');

    text_output.push_str(&format!("{}:\n", "travel".cyan()));
    text_output.push_str(&format!("  origin: {}\n", config.travel.origin));
    text_output.push_str(&format!(
        "  departure_offset_days: {}\n",
        config.travel.departure_offset_days
    ));
    text_output.push_str(&format!(
        "  max_flight_offers: {}\n",
        config.travel.max_flight_offers
    ));
    text_output.push_str(&format!("  max_hotels: {}\n", config.travel.max_hotels));
    text_output.push('\n');

    text_output.push_str(&format!("{}:\n", "storage".cyan()));
    text_output.push_str(&format!(
        "  itinerary_key: {}\n",
        config.storage.itinerary_key
    ));
    text_output.push_str(&format!(
        "  capacity_bytes: {}\n",
        config.storage.capacity_bytes
    ));
    text_output.push('\n');

    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let stored = config.get(key)?.unwrap_or_default();
    let (shown, masked) = if is_sensitive_key(key) {
        (mask_sensitive_value(&stored), true)
    } else {
        (stored, false)
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "masked": masked,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(json)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, json: bool) -> Result<()> {
    let config = Config::load()?;

    let value = match key {
        "api.base_url" => Some(config.api_base_url()),
        "api.client_id" => config.client_id(),
        "api.client_secret" => config.client_secret(),
        _ => config.get(key)?,
    };

    let Some(value) = value else {
        return Err(RouteWiseError::Config(format!("{key} not set")));
    };

    let (json_output, text_output) = if is_sensitive_key(key) {
        let masked = mask_sensitive_value(&value);
        (
            json!({
                "key": key,
                "value": masked,
                "configured": true,
                "masked": true,
            }),
            format!("{masked} (masked - showing first 2 and last 2 characters)"),
        )
    } else {
        (
            json!({
                "key": key,
                "value": value,
            }),
            value.clone(),
        )
    };

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(json)
}
