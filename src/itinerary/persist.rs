//! Persisted layout of the itinerary.
//!
//! The stored value is a versioned envelope:
//!
//! ```json
//! {"version":1,"destinations":[{"id":"PAR","name":"Paris","cityCode":"PAR"}]}
//! ```
//!
//! A bare JSON array (the unversioned layout written by earlier releases) is
//! still accepted and is rewritten in the envelope on the next mutation.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::storage::KeyValueStore;

use super::types::{Itinerary, SavedDestination};

pub const CURRENT_VERSION: u64 = 1;

/// Result of reading the persisted itinerary.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Itinerary),
    Defaulted(DefaultReason),
}

/// Why the empty itinerary was used instead of a stored one.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultReason {
    Missing,
    Malformed(String),
    UnsupportedVersion(u64),
    Unreadable(String),
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::Missing => write!(f, "no saved itinerary"),
            DefaultReason::Malformed(msg) => write!(f, "saved itinerary is malformed: {msg}"),
            DefaultReason::UnsupportedVersion(v) => {
                write!(f, "saved itinerary has unsupported version {v}")
            }
            DefaultReason::Unreadable(msg) => write!(f, "saved itinerary is unreadable: {msg}"),
        }
    }
}

impl LoadOutcome {
    pub fn into_itinerary(self) -> Itinerary {
        match self {
            LoadOutcome::Loaded(itinerary) => itinerary,
            LoadOutcome::Defaulted(_) => Itinerary::new(),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u64,
    destinations: &'a Itinerary,
}

/// Serialize the full itinerary in the current layout.
pub fn encode(itinerary: &Itinerary) -> Result<String> {
    Ok(serde_json::to_string(&Envelope {
        version: CURRENT_VERSION,
        destinations: itinerary,
    })?)
}

/// Parse a stored value. Never fails: anything unusable becomes `Defaulted`.
pub fn decode(text: &str) -> LoadOutcome {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return LoadOutcome::Defaulted(DefaultReason::Malformed(e.to_string())),
    };

    let destinations = match value {
        Value::Array(_) => {
            tracing::debug!("migrating unversioned itinerary layout");
            value
        }
        Value::Object(mut map) => {
            let Some(version) = map.get("version").and_then(Value::as_u64) else {
                return LoadOutcome::Defaulted(DefaultReason::Malformed(
                    "missing version".to_string(),
                ));
            };
            if version == 0 || version > CURRENT_VERSION {
                return LoadOutcome::Defaulted(DefaultReason::UnsupportedVersion(version));
            }
            map.remove("destinations")
                .unwrap_or_else(|| Value::Array(Vec::new()))
        }
        other => {
            return LoadOutcome::Defaulted(DefaultReason::Malformed(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )));
        }
    };

    match serde_json::from_value::<Vec<SavedDestination>>(destinations) {
        Ok(entries) => LoadOutcome::Loaded(Itinerary::from_entries(entries)),
        Err(e) => LoadOutcome::Defaulted(DefaultReason::Malformed(e.to_string())),
    }
}

/// Read and decode the itinerary stored under `key`.
pub fn read_itinerary(storage: &dyn KeyValueStore, key: &str) -> LoadOutcome {
    match storage.read_text(key) {
        Ok(Some(text)) => decode(&text),
        Ok(None) => LoadOutcome::Defaulted(DefaultReason::Missing),
        Err(e) => LoadOutcome::Defaulted(DefaultReason::Unreadable(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
