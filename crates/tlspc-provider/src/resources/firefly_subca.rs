//! `tlspc_firefly_subca`

use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::{FireflySubCaProvider, TlspcApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireflySubCaModel {
    pub id: String,
    pub name: String,
    pub ca_type: String,
    pub ca_account_id: String,
    pub ca_product_option_id: String,
    pub common_name: String,
    pub key_algorithm: String,
    pub validity_period: String,
}

impl FireflySubCaModel {
    fn to_provider(&self, id: &str) -> FireflySubCaProvider {
        FireflySubCaProvider {
            id: id.to_string(),
            name: self.name.clone(),
            ca_type: self.ca_type.clone(),
            ca_account_id: self.ca_account_id.clone(),
            ca_product_option_id: self.ca_product_option_id.clone(),
            common_name: self.common_name.clone(),
            key_algorithm: self.key_algorithm.clone(),
            validity_period: self.validity_period.clone(),
        }
    }
}

impl From<FireflySubCaProvider> for FireflySubCaModel {
    fn from(p: FireflySubCaProvider) -> Self {
        FireflySubCaModel {
            id: p.id,
            name: p.name,
            ca_type: p.ca_type,
            ca_account_id: p.ca_account_id,
            ca_product_option_id: p.ca_product_option_id,
            common_name: p.common_name,
            key_algorithm: p.key_algorithm,
            validity_period: p.validity_period,
        }
    }
}

pub struct FireflySubCaResource {
    api: Arc<dyn TlspcApi>,
}

impl FireflySubCaResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for FireflySubCaResource {
    type Model = FireflySubCaModel;

    fn type_name(&self) -> &'static str {
        "tlspc_firefly_subca"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a Firefly sub-CA provider")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "ca_type",
                Attribute::required_string().describe("CA type, e.g. BUILTIN"),
            )
            .with_attribute(
                "ca_account_id",
                Attribute::required_string().validated(Validator::Uuid),
            )
            .with_attribute(
                "ca_product_option_id",
                Attribute::required_string().validated(Validator::Uuid),
            )
            .with_attribute("common_name", Attribute::required_string())
            .with_attribute(
                "key_algorithm",
                Attribute::required_string().describe("Key algorithm, e.g. EC_P256"),
            )
            .with_attribute(
                "validity_period",
                Attribute::required_string().describe("ISO 8601 period, e.g. P90D"),
            )
    }

    async fn create(&self, mut plan: FireflySubCaModel) -> Result<FireflySubCaModel> {
        let created = self
            .api
            .create_firefly_subca_provider(&plan.to_provider(""))
            .await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, state: FireflySubCaModel) -> Result<FireflySubCaModel> {
        let provider = self.api.get_firefly_subca_provider(&state.id).await?;
        Ok(provider.into())
    }

    async fn update(
        &self,
        state: FireflySubCaModel,
        mut plan: FireflySubCaModel,
    ) -> Result<FireflySubCaModel> {
        plan.id = state.id.clone();
        if plan == state {
            tracing::debug!("Firefly sub-CA provider {} unchanged", state.id);
            return Ok(plan);
        }
        self.api
            .update_firefly_subca_provider(&plan.to_provider(&state.id))
            .await?;
        Ok(plan)
    }

    async fn delete(&self, state: FireflySubCaModel) -> Result<()> {
        self.api.delete_firefly_subca_provider(&state.id).await?;
        Ok(())
    }
}
