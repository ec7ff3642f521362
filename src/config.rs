//! Top-level application configuration.
//!
//! Configuration is stored in `<root>/config.yaml` and includes:
//! - Travel API endpoint and client credentials
//! - Travel defaults (origin airport, departure offset, result limits)
//! - Storage settings for the persisted itinerary

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteWiseError};
use crate::paths::routewise_root;

pub const DEFAULT_API_URL: &str = "https://test.api.amadeus.com";
pub const DEFAULT_ITINERARY_KEY: &str = "routewise-itinerary";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.client_id",
    "api.client_secret",
    "api.timeout",
    "travel.origin",
    "travel.departure_offset_days",
    "travel.max_flight_offers",
    "travel.max_hotels",
    "storage.itinerary_key",
    "storage.capacity_bytes",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub travel: TravelConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Travel API endpoint and credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_api_timeout")]
    pub timeout: u64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id.as_ref().map(|_| "[REDACTED]"))
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            client_id: None,
            client_secret: None,
            timeout: default_api_timeout(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_timeout() -> u64 {
    30
}

/// Defaults used when querying flights and hotels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    /// Origin location code for flight searches (default: LON)
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Days from today used as the departure date (default: 7)
    #[serde(default = "default_departure_offset_days")]
    pub departure_offset_days: u32,

    #[serde(default = "default_max_flight_offers")]
    pub max_flight_offers: u32,

    #[serde(default = "default_max_hotels")]
    pub max_hotels: usize,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            departure_offset_days: default_departure_offset_days(),
            max_flight_offers: default_max_flight_offers(),
            max_hotels: default_max_hotels(),
        }
    }
}

fn default_origin() -> String {
    "LON".to_string()
}

fn default_departure_offset_days() -> u32 {
    7
}

fn default_max_flight_offers() -> u32 {
    5
}

fn default_max_hotels() -> usize {
    6
}

/// Persisted itinerary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_itinerary_key")]
    pub itinerary_key: String,

    /// Maximum size of a single stored value (default: 5 MiB)
    #[serde(default = "default_capacity_bytes")]
    pub capacity_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            itinerary_key: default_itinerary_key(),
            capacity_bytes: default_capacity_bytes(),
        }
    }
}

fn default_itinerary_key() -> String {
    DEFAULT_ITINERARY_KEY.to_string()
}

fn default_capacity_bytes() -> usize {
    5 * 1024 * 1024
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        routewise_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            RouteWiseError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config document, checking fields that `set` would also reject
    fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml_ng::from_str(content)?;
        crate::storage::validate_key(&config.storage.itinerary_key).map_err(|e| {
            RouteWiseError::Config(format!("storage.itinerary_key in config.yaml: {e}"))
        })?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RouteWiseError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            RouteWiseError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Credentials live in this file: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, permissions).map_err(|e| {
                RouteWiseError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to set permissions on config at {}: {}",
                        path.display(),
                        e
                    ),
                ))
            })?;
        }

        Ok(())
    }

    /// API base URL, preferring `ROUTEWISE_API_URL` when set
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = env::var("ROUTEWISE_API_URL")
            && !url.is_empty()
        {
            return url;
        }
        self.api.base_url.clone()
    }

    /// Client id from environment variable or config file
    pub fn client_id(&self) -> Option<String> {
        if let Ok(key) = env::var("AMADEUS_API_KEY")
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api.client_id.clone()
    }

    /// Client secret from environment variable or config file
    pub fn client_secret(&self) -> Option<String> {
        if let Ok(secret) = env::var("AMADEUS_API_SECRET")
            && !secret.is_empty()
        {
            return Some(secret);
        }
        self.api.client_secret.clone()
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    /// Read a configuration value by dotted key.
    ///
    /// Returns `Ok(None)` for known keys that are unset.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.client_id" => self.api.client_id.clone(),
            "api.client_secret" => self.api.client_secret.clone(),
            "api.timeout" => Some(self.api.timeout.to_string()),
            "travel.origin" => Some(self.travel.origin.clone()),
            "travel.departure_offset_days" => Some(self.travel.departure_offset_days.to_string()),
            "travel.max_flight_offers" => Some(self.travel.max_flight_offers.to_string()),
            "travel.max_hotels" => Some(self.travel.max_hotels.to_string()),
            "storage.itinerary_key" => Some(self.storage.itinerary_key.clone()),
            "storage.capacity_bytes" => Some(self.storage.capacity_bytes.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a configuration value by dotted key, validating its type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value).map_err(|e| {
                    RouteWiseError::Config(format!("invalid URL '{value}': {e}"))
                })?;
                self.api.base_url = value.trim_end_matches('/').to_string();
            }
            "api.client_id" => self.api.client_id = Some(value.to_string()),
            "api.client_secret" => self.api.client_secret = Some(value.to_string()),
            "api.timeout" => self.api.timeout = parse_number(key, value)?,
            "travel.origin" => {
                let code = value.trim().to_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(RouteWiseError::Config(format!(
                        "invalid origin '{value}': expected a 3-letter location code"
                    )));
                }
                self.travel.origin = code;
            }
            "travel.departure_offset_days" => {
                self.travel.departure_offset_days = parse_number(key, value)?
            }
            "travel.max_flight_offers" => {
                let max: u32 = parse_number(key, value)?;
                if max == 0 || max > 250 {
                    return Err(RouteWiseError::Config(format!(
                        "{key} must be between 1 and 250"
                    )));
                }
                self.travel.max_flight_offers = max;
            }
            "travel.max_hotels" => self.travel.max_hotels = parse_number(key, value)?,
            "storage.itinerary_key" => {
                crate::storage::validate_key(value)?;
                self.storage.itinerary_key = value.to_string();
            }
            "storage.capacity_bytes" => self.storage.capacity_bytes = parse_number(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

/// Whether a key holds a credential that must not be printed in full
pub fn is_sensitive_key(key: &str) -> bool {
    matches!(key, "api.client_id" | "api.client_secret")
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        RouteWiseError::Config(format!(
            "invalid value '{value}' for {key}: expected a non-negative integer"
        ))
    })
}

fn unknown_key(key: &str) -> RouteWiseError {
    RouteWiseError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}
