use serde::Serialize;
use thiserror::Error;

/// Top-level error type for the `jiofly-api` crate.
///
/// Covers the fetch side only. XML that cannot be parsed is not an error:
/// the page parsers degrade to an empty, `Unavailable` result instead.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The device answered with a non-success status code.
    #[error("Device returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// A composite field whose text could not be decomposed into its
/// declared sub-facts.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// Fewer comma-separated tokens than the field's declared arity.
    #[error("malformed field `{field}`: expected {expected} values, found {found}")]
    Malformed {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

impl FieldError {
    /// Source element name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Malformed { field, .. } => field,
        }
    }
}
