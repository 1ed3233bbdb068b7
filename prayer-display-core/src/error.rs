use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - please edit it with your API address and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Missing required config field: {field}")]
    ConfigMissingField { field: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Invalid duration \"{input}\": expected a millisecond count or a value like \"30s\", \"1m\", \"1H\"")]
    InvalidDuration { input: String },

    // Fetch errors
    /// The request deadline elapsed before a response arrived.
    #[error("Timeout after {duration}")]
    Timeout { duration: String },

    /// The server answered with a non-success status.
    #[error("{body} ({status})")]
    HttpStatus { status: u16, body: String },

    #[error("Unexpected response from {url}: expected JSON")]
    UnexpectedContentType { url: String },

    // Network errors
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Network request failed: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Failed to decode response: {0}")]
    JsonError(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Whether this error came from the request deadline rather than the server.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
