//! TLSPC client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TlspcError {
    /// Transport failure (connection, DNS, TLS), passed through untouched.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error encoding request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Error decoding response ({source}): {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// A write or lookup returned a payload without an identifier.
    #[error("Didn't {action}; response was: {body}")]
    MissingId { action: &'static str, body: String },

    #[error("Failed to {action} (status {status}); response was: {body}")]
    UnexpectedStatus {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected number of {what} returned ({count})")]
    UnexpectedCount { what: &'static str, count: usize },

    #[error("{0}")]
    NotFound(String),

    #[error("Empty ID")]
    EmptyId,

    #[error("Invalid identifier {value:?}: {source}")]
    InvalidId {
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("{0}")]
    UnexpectedVariant(String),

    #[error("Invalid project number {value:?}")]
    InvalidProjectNumber { value: String },
}

pub type Result<T> = std::result::Result<T, TlspcError>;
