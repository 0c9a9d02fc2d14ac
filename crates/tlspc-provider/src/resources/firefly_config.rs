//! `tlspc_firefly_config`
//!
//! Binds a sub-CA provider, policies and service accounts together. The
//! minimum TLS version is fixed at TLS 1.3.

use super::{to_set, to_vec};
use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tlspc_client::firefly::MIN_TLS_VERSION;
use tlspc_client::{FireflyConfig, TlspcApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireflyConfigModel {
    pub id: String,
    pub name: String,
    pub subca_provider: String,
    pub service_accounts: BTreeSet<String>,
    pub policies: BTreeSet<String>,
}

impl FireflyConfigModel {
    fn to_config(&self, id: &str) -> FireflyConfig {
        FireflyConfig {
            id: id.to_string(),
            name: self.name.clone(),
            policy_ids: to_vec(&self.policies),
            service_account_ids: to_vec(&self.service_accounts),
            sub_ca_provider_id: self.subca_provider.clone(),
            min_tls_version: MIN_TLS_VERSION.to_string(),
            ..Default::default()
        }
    }
}

pub struct FireflyConfigResource {
    api: Arc<dyn TlspcApi>,
}

impl FireflyConfigResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for FireflyConfigResource {
    type Model = FireflyConfigModel;

    fn type_name(&self) -> &'static str {
        "tlspc_firefly_config"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a Firefly configuration")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "subca_provider",
                Attribute::required_string()
                    .validated(Validator::Uuid)
                    .describe("ID of the Firefly sub-CA provider"),
            )
            .with_attribute(
                "service_accounts",
                Attribute::required(Attribute::string_set())
                    .validated(Validator::each(Validator::Uuid))
                    .describe("IDs of service accounts allowed to use this configuration"),
            )
            .with_attribute(
                "policies",
                Attribute::required(Attribute::string_set())
                    .validated(Validator::each(Validator::Uuid))
                    .describe("IDs of Firefly policies"),
            )
    }

    async fn create(&self, mut plan: FireflyConfigModel) -> Result<FireflyConfigModel> {
        let created = self.api.create_firefly_config(&plan.to_config("")).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, mut state: FireflyConfigModel) -> Result<FireflyConfigModel> {
        let config = self.api.get_firefly_config(&state.id).await?;

        state.id = config.id;
        state.name = config.name;
        state.service_accounts = to_set(config.service_account_ids);
        state.policies = config.policies.into_iter().map(|p| p.id).collect();
        if !config.sub_ca_provider_id.is_empty() {
            state.subca_provider = config.sub_ca_provider_id;
        }
        Ok(state)
    }

    async fn update(
        &self,
        state: FireflyConfigModel,
        mut plan: FireflyConfigModel,
    ) -> Result<FireflyConfigModel> {
        plan.id = state.id.clone();
        if plan == state {
            tracing::debug!("Firefly configuration {} unchanged", state.id);
            return Ok(plan);
        }
        self.api
            .update_firefly_config(&plan.to_config(&state.id))
            .await?;
        Ok(plan)
    }

    async fn delete(&self, state: FireflyConfigModel) -> Result<()> {
        self.api.delete_firefly_config(&state.id).await?;
        Ok(())
    }
}
