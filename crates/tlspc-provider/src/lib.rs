//! Venafi TLS Protect Cloud provider
//!
//! Reconcilers map declared configuration for teams, service accounts,
//! certificate templates, applications, Firefly issuance, GCP cloud
//! providers, registry accounts and plugins onto the TLSPC API.
//!
//! ```no_run
//! use tlspc_provider::{ProviderConfig, TlspcProvider};
//!
//! # async fn run() -> tlspc_provider::Result<()> {
//! let provider = TlspcProvider::configure(&ProviderConfig::default(), "0.1.0")?;
//! let state = provider
//!     .read_data_source("tlspc_user", serde_json::json!({"email": "ops@example.com"}))
//!     .await?;
//! println!("{}", state["id"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_sources;
pub mod error;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod validators;

#[cfg(test)]
mod testing;

pub use config::{ProviderConfig, ResolvedConfig};
pub use error::{ProviderError, Result};
pub use provider::{PROVIDER_NAME, ProviderSchemas, TlspcProvider};
pub use resource::{DataSource, DynDataSource, DynResource, Resource};
pub use schema::{Attribute, AttributeMode, AttributeType, Diagnostic, Schema};
pub use validators::Validator;
