//! Provider error types

use crate::schema::Diagnostic;
use thiserror::Error;
use tlspc_client::TlspcError;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Rejected before any request was sent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing API key: set the apikey attribute or the TLSPC_APIKEY environment variable")]
    MissingApiKey,

    #[error("Validation failed: {}", join_diagnostics(.0))]
    Validation(Vec<Diagnostic>),

    #[error("GCP cloud provider {0} could not be validated")]
    NotValidated(String),

    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("API error: {0}")]
    Api(#[from] TlspcError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_diagnostics(diags: &[Diagnostic]) -> String {
    diags
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ProviderError>;
