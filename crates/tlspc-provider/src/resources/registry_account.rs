//! `tlspc_registry_account`
//!
//! Pull credentials for the vendor OCI registry. Backed by a service account
//! with `ociToken` authentication. The registry token is only returned on
//! creation and is carried forward from state afterwards.

use super::service_account::ServiceAccountShape;
use super::{to_set, to_vec};
use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tlspc_client::TlspcApi;

pub const REGISTRY_SCOPES: &[&str] = &[
    "oci-registry-cm",
    "oci-registry-cm-ape",
    "oci-registry-cm-vei",
    "oci-registry-cm-os",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryAccountModel {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub scopes: BTreeSet<String>,
    pub credential_lifetime: i32,
    pub oci_account_name: String,
    pub oci_registry_token: String,
    pub credential_expiry: String,
}

fn rfc3339(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub struct RegistryAccountResource {
    api: Arc<dyn TlspcApi>,
}

impl RegistryAccountResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }

    fn shape(plan: &RegistryAccountModel) -> ServiceAccountShape {
        ServiceAccountShape::RegistryToken {
            credential_lifetime: plan.credential_lifetime,
        }
    }
}

#[async_trait]
impl Resource for RegistryAccountResource {
    type Model = RegistryAccountModel;

    fn type_name(&self) -> &'static str {
        "tlspc_registry_account"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage pull credentials for the Venafi OCI private registry")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "owner",
                Attribute::required_string()
                    .validated(Validator::Uuid)
                    .describe("ID of the team that owns this account"),
            )
            .with_attribute(
                "scopes",
                Attribute::required(Attribute::string_set())
                    .validated(Validator::each(Validator::one_of(REGISTRY_SCOPES)))
                    .describe("Images this account may pull"),
            )
            .with_attribute(
                "credential_lifetime",
                Attribute::required(AttributeType::Int32).describe("Credential lifetime in days"),
            )
            .with_attribute("oci_account_name", Attribute::computed_string())
            .with_attribute("oci_registry_token", Attribute::computed_string().sensitive())
            .with_attribute(
                "credential_expiry",
                Attribute::computed_string().describe("Credential expiry (RFC 3339)"),
            )
    }

    async fn create(&self, mut plan: RegistryAccountModel) -> Result<RegistryAccountModel> {
        let request =
            Self::shape(&plan).to_request("", &plan.name, &plan.owner, to_vec(&plan.scopes));
        let created = self.api.create_service_account(&request).await?;

        plan.id = created.id;
        plan.oci_account_name = created.oci_account_name;
        plan.oci_registry_token = created.oci_registry_token;
        if let Some(expiry) = rfc3339(created.credential_expiry) {
            plan.credential_expiry = expiry;
        }
        Ok(plan)
    }

    async fn read(&self, mut state: RegistryAccountModel) -> Result<RegistryAccountModel> {
        let sa = self.api.get_service_account(&state.id).await?;

        state.id = sa.id;
        state.name = sa.name;
        state.owner = sa.owner;
        state.scopes = to_set(sa.scopes);
        state.credential_lifetime = sa.credential_lifetime;
        if !sa.oci_account_name.is_empty() {
            state.oci_account_name = sa.oci_account_name;
        }
        if let Some(expiry) = rfc3339(sa.credential_expiry) {
            state.credential_expiry = expiry;
        }
        Ok(state)
    }

    async fn update(
        &self,
        state: RegistryAccountModel,
        mut plan: RegistryAccountModel,
    ) -> Result<RegistryAccountModel> {
        plan.id = state.id.clone();
        plan.oci_account_name = state.oci_account_name.clone();
        plan.oci_registry_token = state.oci_registry_token.clone();
        plan.credential_expiry = state.credential_expiry.clone();

        if plan == state {
            tracing::debug!("Registry account {} unchanged", state.id);
            return Ok(plan);
        }

        let request =
            Self::shape(&plan).to_request(&state.id, &plan.name, &plan.owner, to_vec(&plan.scopes));
        self.api.update_service_account(&request).await?;
        Ok(plan)
    }

    async fn delete(&self, state: RegistryAccountModel) -> Result<()> {
        self.api.delete_service_account(&state.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, NEW_ID};
    use tlspc_client::ServiceAccount;

    fn plan() -> RegistryAccountModel {
        RegistryAccountModel {
            name: "pull".into(),
            owner: "0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f".into(),
            scopes: ["oci-registry-cm".to_string()].into(),
            credential_lifetime: 365,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_sends_oci_token() {
        let api = FakeApi::new();
        api.respond_with(
            "create_service_account",
            ServiceAccount {
                id: NEW_ID.into(),
                oci_account_name: "acct-123".into(),
                oci_registry_token: "token".into(),
                credential_expiry: "2026-01-01T00:00:00Z".parse().ok(),
                ..Default::default()
            },
        );
        let resource = RegistryAccountResource::new(api.clone());
        let state = resource.create(plan()).await.unwrap();

        let payload = &api.payloads("create_service_account")[0];
        assert_eq!(payload["authenticationType"], "ociToken");
        assert_eq!(payload["credentialLifetime"], 365);
        assert_eq!(state.oci_account_name, "acct-123");
        assert_eq!(state.oci_registry_token, "token");
        assert_eq!(state.credential_expiry, "2026-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_update_keeps_token() {
        let api = FakeApi::new();
        let resource = RegistryAccountResource::new(api.clone());
        let state = RegistryAccountModel {
            id: "ra-1".into(),
            oci_account_name: "acct".into(),
            oci_registry_token: "secret".into(),
            ..plan()
        };
        let planned = RegistryAccountModel {
            credential_lifetime: 30,
            ..plan()
        };
        let updated = resource.update(state, planned).await.unwrap();

        assert_eq!(updated.oci_registry_token, "secret");
        assert_eq!(updated.id, "ra-1");
        assert_eq!(api.payloads("update_service_account")[0]["credentialLifetime"], 30);
    }

    #[tokio::test]
    async fn test_unchanged_update_skipped() {
        let api = FakeApi::new();
        let resource = RegistryAccountResource::new(api.clone());
        let state = RegistryAccountModel {
            id: "ra-1".into(),
            oci_registry_token: "secret".into(),
            ..plan()
        };
        resource.update(state, plan()).await.unwrap();
        assert!(api.calls().is_empty());
    }
}
