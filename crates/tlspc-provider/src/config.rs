//! Provider configuration
//!
//! Values come from `TLSPC_APIKEY` / `TLSPC_ENDPOINT` first; anything set
//! explicitly in the declared configuration wins.

use crate::error::{ProviderError, Result};
use crate::schema::{Attribute, Schema};
use serde::Deserialize;
use std::fmt;

pub const ENV_APIKEY: &str = "TLSPC_APIKEY";
pub const ENV_ENDPOINT: &str = "TLSPC_ENDPOINT";

/// Declared provider configuration, as written by the user.
#[derive(Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub apikey: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Configuration after environment fallback, ready to build a client.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_key: String,
    pub endpoint: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("apikey", &self.apikey.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    pub fn schema() -> Schema {
        Schema::new("Venafi TLS Protect Cloud provider configuration")
            .with_attribute(
                "apikey",
                Attribute::optional_string()
                    .sensitive()
                    .describe("API key; falls back to TLSPC_APIKEY"),
            )
            .with_attribute(
                "endpoint",
                Attribute::optional_string().describe(
                    "API endpoint; falls back to TLSPC_ENDPOINT, then https://api.venafi.cloud",
                ),
            )
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    pub fn resolve_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<ResolvedConfig> {
        let api_key = non_empty(self.apikey.clone())
            .or_else(|| non_empty(env(ENV_APIKEY)))
            .ok_or(ProviderError::MissingApiKey)?;
        let endpoint = non_empty(self.endpoint.clone()).or_else(|| non_empty(env(ENV_ENDPOINT)));

        tracing::debug!(
            "Provider configured (endpoint: {})",
            endpoint.as_deref().unwrap_or("default")
        );
        Ok(ResolvedConfig { api_key, endpoint })
    }
}
