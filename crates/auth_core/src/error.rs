use std::path::PathBuf;

use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthStoreError {
    #[error("network request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("auth server rejected request: {0}")]
    Api(#[from] ApiException),
    #[error("invalid auth endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("session file {path} could not be accessed: {source}")]
    SessionIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("session file {path} is malformed: {source}")]
    SessionFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid supabase url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unable to resolve local app data dir")]
    NoDataDir,
}
