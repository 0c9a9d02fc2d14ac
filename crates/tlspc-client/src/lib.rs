//! Venafi TLS Protect Cloud API client
//!
//! REST endpoints for teams, service accounts, plugins, certificate
//! templates, applications and Firefly objects, plus the GraphQL operations
//! used for GCP cloud provider integrations.
//!
//! # Example
//!
//! ```ignore
//! use tlspc_client::Client;
//!
//! let client = Client::new(api_key, None, env!("CARGO_PKG_VERSION"));
//! let user = client.get_user("someone@example.com").await?;
//! let team = client.get_team(&team_id).await?;
//! ```

pub mod api;
pub mod applications;
pub mod ca_products;
pub mod certificate_templates;
pub mod client;
pub mod cloud_providers;
pub mod error;
pub mod firefly;
mod graphql;
pub mod plugins;
pub mod service_accounts;
pub mod teams;
pub mod users;

pub use api::TlspcApi;
pub use applications::{Application, OwnerAndType};
pub use ca_products::{CaAccount, CaProductDetails, CaProductOption, CaProductTemplate};
pub use certificate_templates::{CertificateTemplate, KeyType};
pub use client::{Client, DEFAULT_ENDPOINT};
pub use cloud_providers::{CloudProviderStatus, GcpProvider};
pub use error::{Result, TlspcError};
pub use firefly::{
    FireflyConfig, FireflyPolicy, FireflySubCaProvider, KeyAlgorithm, PolicyDetails,
    PolicySubject, Sans,
};
pub use plugins::Plugin;
pub use service_accounts::ServiceAccount;
pub use teams::{Team, UserMatchingRule};
pub use users::User;
