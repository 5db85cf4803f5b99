//! Error types for skillpipe
//!
//! Every stage of the pipeline reports failures through [`SkillError`],
//! whose `Display` output is a single human-readable line.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error type for all skillpipe operations
#[derive(Error, Debug)]
pub enum SkillError {
    /// Primary input was empty or unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Remote side answered with a non-success status
    ///
    /// `body` holds the response body when it could be read, for diagnostics.
    #[error("HTTP {code}")]
    HttpStatus { code: u16, body: Option<String> },

    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Redirect chain exceeded the hop budget
    #[error("Too many redirects (budget {budget})")]
    TooManyRedirects { budget: u32 },

    /// Upstream payload lacked the field that carries the answer
    #[error("Missing payload: {0}")]
    MissingPayload(String),

    /// Selector or markup problem
    #[error("Failed to parse: {0}")]
    ParseError(String),

    /// Response body was not valid JSON
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure while reading or writing an artifact
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Deadline elapsed before the operation completed
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Missing or invalid configuration (API keys, endpoints)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mailbox provider or SMTP relay refused the operation
    #[error("Mailbox error: {0}")]
    Mail(String),
}

impl SkillError {
    /// Wrap a `std::io::Error` with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Status code carried by the error, if it came from an HTTP response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for skillpipe operations
pub type Result<T> = std::result::Result<T, SkillError>;
