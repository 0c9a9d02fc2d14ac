//! `tlspc_cloudprovider_gcp_validate`
//!
//! Drives the one-way validation of a GCP cloud provider. Validation can
//! only ever be requested; there is nothing to undo on delete.

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::TlspcApi;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudProviderGcpValidateModel {
    pub cloudprovider_id: String,
    pub validate: bool,
}

pub struct CloudProviderGcpValidateResource {
    api: Arc<dyn TlspcApi>,
}

impl CloudProviderGcpValidateResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }

    async fn validate(&self, id: &str) -> Result<()> {
        if self.api.validate_gcp_provider(id).await? {
            Ok(())
        } else {
            Err(ProviderError::NotValidated(id.to_string()))
        }
    }
}

fn only_true() -> ProviderError {
    ProviderError::InvalidConfig("Validate can only be set to true".to_string())
}

#[async_trait]
impl Resource for CloudProviderGcpValidateResource {
    type Model = CloudProviderGcpValidateModel;

    fn type_name(&self) -> &'static str {
        "tlspc_cloudprovider_gcp_validate"
    }

    fn schema(&self) -> Schema {
        Schema::new("Validate a GCP cloud provider connection")
            .with_attribute(
                "cloudprovider_id",
                Attribute::required_string().validated(Validator::Uuid),
            )
            .with_attribute(
                "validate",
                Attribute::required(AttributeType::Bool).describe("Must be true"),
            )
    }

    async fn create(
        &self,
        plan: CloudProviderGcpValidateModel,
    ) -> Result<CloudProviderGcpValidateModel> {
        if !plan.validate {
            return Err(only_true());
        }
        self.validate(&plan.cloudprovider_id).await?;
        Ok(plan)
    }

    async fn read(
        &self,
        mut state: CloudProviderGcpValidateModel,
    ) -> Result<CloudProviderGcpValidateModel> {
        // The API does not tell a failed lookup from an unvalidated provider.
        state.validate = match self.api.gcp_provider_validated(&state.cloudprovider_id).await {
            Ok(validated) => validated,
            Err(e) => {
                tracing::warn!(
                    "Could not read validation state of {}: {}",
                    state.cloudprovider_id,
                    e
                );
                false
            }
        };
        Ok(state)
    }

    async fn update(
        &self,
        state: CloudProviderGcpValidateModel,
        plan: CloudProviderGcpValidateModel,
    ) -> Result<CloudProviderGcpValidateModel> {
        if !plan.validate {
            return Err(if state.validate {
                ProviderError::InvalidConfig("Can not unvalidate connection status".to_string())
            } else {
                only_true()
            });
        }
        if !state.validate || state.cloudprovider_id != plan.cloudprovider_id {
            self.validate(&plan.cloudprovider_id).await?;
        }
        Ok(plan)
    }

    async fn delete(&self, state: CloudProviderGcpValidateModel) -> Result<()> {
        tracing::debug!(
            "Validation of {} cannot be revoked; dropping it from state",
            state.cloudprovider_id
        );
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<CloudProviderGcpValidateModel> {
        self.read(CloudProviderGcpValidateModel {
            cloudprovider_id: id.to_string(),
            validate: false,
        })
        .await
    }
}
