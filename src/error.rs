use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteWiseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to {operation} '{key}' at {}: {source}", path.display())]
    StorageError {
        operation: &'static str,
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage quota exceeded for '{key}': {size} bytes exceeds limit of {limit} bytes")]
    QuotaExceeded { key: String, size: usize, limit: usize },

    #[error("invalid storage key '{0}': keys may only contain letters, digits, '.', '_' and '-'")]
    InvalidKey(String),

    #[error("storage write rejected: {0}")]
    WriteRejected(String),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by travel API, retry after {0} seconds")]
    RateLimited(u64),

    #[error("no page at '{0}'")]
    InvalidRoute(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RouteWiseError>;
