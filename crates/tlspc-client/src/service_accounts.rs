//! Service accounts
//!
//! One API object backs three shapes of account, told apart by
//! `authenticationType`: `rsaKey`, `rsaKeyFederated` and `ociToken`.

use crate::client::{
    Client, Identified, decode_identified, expect_status, require_non_empty,
};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const AUTH_RSA_KEY: &str = "rsaKey";
pub const AUTH_RSA_KEY_FEDERATED: &str = "rsaKeyFederated";
pub const AUTH_OCI_TOKEN: &str = "ociToken";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub credential_lifetime: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub authentication_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub oci_account_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub oci_registry_token: String,
    #[serde(default, rename = "jwksURI", skip_serializing_if = "String::is_empty")]
    pub jwks_uri: String,
    #[serde(default, rename = "issuerURL", skip_serializing_if = "String::is_empty")]
    pub issuer_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub audience: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_expiry: Option<DateTime<Utc>>,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

impl Identified for ServiceAccount {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Client {
    /// Create a service account
    pub async fn create_service_account(&self, sa: &ServiceAccount) -> Result<ServiceAccount> {
        tracing::info!(
            "Creating service account {} ({})",
            sa.name,
            sa.authentication_type
        );
        let raw = self.post("/v1/serviceaccounts", sa).await?;
        decode_identified(&raw, "create a service account")
    }

    /// Get a service account by id
    pub async fn get_service_account(&self, id: &str) -> Result<ServiceAccount> {
        let raw = self.get(&format!("/v1/serviceaccounts/{}", id)).await?;
        decode_identified(&raw, "find a service account")
    }

    /// The identifier travels in the path only.
    pub async fn update_service_account(&self, sa: &ServiceAccount) -> Result<()> {
        require_non_empty(&sa.id)?;
        tracing::info!("Updating service account {}", sa.id);

        let body = ServiceAccount {
            id: String::new(),
            ..sa.clone()
        };
        let raw = self
            .patch(&format!("/v1/serviceaccounts/{}", sa.id), &body)
            .await?;
        expect_status(&raw, &[204], "update service account")
    }

    /// Delete a service account
    pub async fn delete_service_account(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting service account {}", id);
        let raw = self.delete(&format!("/v1/serviceaccounts/{}", id)).await?;
        expect_status(&raw, &[204], "delete service account")
    }
}
