//! `tlspc_cloudprovider_gcp`
//!
//! GCP workload identity federation. Managed through the GraphQL API.

use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::{GcpProvider, TlspcApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudProviderGcpModel {
    pub id: String,
    pub issuer_url: String,
    pub name: String,
    pub team: String,
    pub service_account_email: String,
    pub project_number: i64,
    pub workload_identity_pool_id: String,
    pub workload_identity_pool_provider_id: String,
}

impl CloudProviderGcpModel {
    fn to_provider(&self, id: &str) -> GcpProvider {
        GcpProvider {
            id: id.to_string(),
            issuer_url: String::new(),
            name: self.name.clone(),
            team: self.team.clone(),
            service_account_email: self.service_account_email.clone(),
            project_number: self.project_number,
            workload_identity_pool_id: self.workload_identity_pool_id.clone(),
            workload_identity_pool_provider_id: self.workload_identity_pool_provider_id.clone(),
        }
    }
}

impl From<GcpProvider> for CloudProviderGcpModel {
    fn from(p: GcpProvider) -> Self {
        CloudProviderGcpModel {
            id: p.id,
            issuer_url: p.issuer_url,
            name: p.name,
            team: p.team,
            service_account_email: p.service_account_email,
            project_number: p.project_number,
            workload_identity_pool_id: p.workload_identity_pool_id,
            workload_identity_pool_provider_id: p.workload_identity_pool_provider_id,
        }
    }
}

pub struct CloudProviderGcpResource {
    api: Arc<dyn TlspcApi>,
}

impl CloudProviderGcpResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for CloudProviderGcpResource {
    type Model = CloudProviderGcpModel;

    fn type_name(&self) -> &'static str {
        "tlspc_cloudprovider_gcp"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a GCP cloud provider integration")
            .with_attribute(
                "issuer_url",
                Attribute::computed_string().describe("OIDC issuer for the workload identity pool"),
            )
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "team",
                Attribute::required_string()
                    .validated(Validator::Uuid)
                    .describe("ID of the owning team"),
            )
            .with_attribute("service_account_email", Attribute::required_string())
            .with_attribute("project_number", Attribute::required(AttributeType::Int64))
            .with_attribute("workload_identity_pool_id", Attribute::required_string())
            .with_attribute(
                "workload_identity_pool_provider_id",
                Attribute::required_string(),
            )
    }

    async fn create(&self, mut plan: CloudProviderGcpModel) -> Result<CloudProviderGcpModel> {
        let created = self.api.create_gcp_provider(&plan.to_provider("")).await?;
        plan.id = created.id;
        plan.issuer_url = created.issuer_url;
        Ok(plan)
    }

    async fn read(&self, state: CloudProviderGcpModel) -> Result<CloudProviderGcpModel> {
        let provider = self.api.get_gcp_provider(&state.id).await?;
        Ok(CloudProviderGcpModel {
            id: state.id,
            ..provider.into()
        })
    }

    async fn update(
        &self,
        state: CloudProviderGcpModel,
        mut plan: CloudProviderGcpModel,
    ) -> Result<CloudProviderGcpModel> {
        plan.id = state.id.clone();
        plan.issuer_url = state.issuer_url.clone();
        if plan == state {
            tracing::debug!("GCP cloud provider {} unchanged", state.id);
            return Ok(plan);
        }
        let updated = self.api.update_gcp_provider(&plan.to_provider(&state.id)).await?;
        plan.issuer_url = updated.issuer_url;
        Ok(plan)
    }

    async fn delete(&self, state: CloudProviderGcpModel) -> Result<()> {
        self.api.delete_gcp_provider(&state.id).await?;
        Ok(())
    }
}
