//! Error types for the reddit-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Listing input errors
    #[error("Listing error: {0}")]
    Listing(String),

    // Resolution errors
    #[error("Not a downloadable link: {0}")]
    NotADownloadableLink(String),

    #[error("{site}: {message}")]
    SiteDownloader { site: &'static str, message: String },

    #[error("No resources found: {0}")]
    ResourceNotFound(String),

    // Resource errors
    #[error("Resource has no file extension: {0}")]
    MissingExtension(String),

    #[error("Resource content not fetched yet: {0}")]
    ContentNotFetched(String),

    // Transfer errors
    #[error("HTTP {status} fetching {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("Empty response body from {0}")]
    EmptyResponse(String),

    #[error("Retry wait budget of {budget_secs}s exhausted fetching {url}")]
    RetryBudgetExhausted { url: String, budget_secs: u64 },

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const LISTING_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
