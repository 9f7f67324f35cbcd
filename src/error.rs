//! Error types for threadsplit.
//!
//! Only conditions the caller must see live here. Transient network failures
//! are handled inside the fetch loop and never reach this type (see
//! [`crate::fetcher::TransportError`]).

/// Error type for fetch, parse and export operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Non-transient HTTP client failure (request could not be built or sent).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure that retrying cannot fix.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::fetcher::TransportError),

    /// Local file or export destination I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A locator that looks like a URL but does not parse as one.
    #[error("Invalid thread locator: {0}")]
    InvalidLocator(String),

    /// A post container whose body matched none of the known templates.
    ///
    /// This signals a new page layout and is never retried.
    #[error("Unsupported post layout: {0}")]
    UnsupportedLayout(String),

    /// A local page has no root post and no terminal marker.
    #[error("Root post missing in local page: {0}")]
    RootMissing(String),

    /// The optional attempt bound was reached before a usable page arrived.
    #[error("Gave up on {locator} after {attempts} attempts")]
    RetriesExhausted {
        /// Locator that was being fetched.
        locator: String,
        /// Number of attempts made.
        attempts: u32,
    },
}

/// Result type alias for threadsplit operations.
pub type Result<T> = std::result::Result<T, Error>;
