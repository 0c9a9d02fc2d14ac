//! Firefly distributed issuance: policies, sub-CA providers and configurations

use crate::client::{
    Client, Identified, decode_identified, expect_status, require_non_empty,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

const CONFIGURATIONS_PATH: &str = "/v1/distributedissuers/configurations";
const SUBCA_PROVIDERS_PATH: &str = "/v1/distributedissuers/subcaproviders";
const POLICIES_PATH: &str = "/v1/distributedissuers/policies";

pub const MIN_TLS_VERSION: &str = "TLS13";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireflyConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
    /// Populated by the server on reads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<FireflyPolicy>,
    #[serde(default)]
    pub service_account_ids: Vec<String>,
    #[serde(default)]
    pub sub_ca_provider_id: String,
    #[serde(rename = "minTlsVersion", default)]
    pub min_tls_version: String,
    #[serde(default)]
    pub cloud_providers: CloudProviders,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudProviders {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireflySubCaProvider {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ca_type: String,
    #[serde(default)]
    pub ca_account_id: String,
    #[serde(default)]
    pub ca_product_option_id: String,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub key_algorithm: String,
    #[serde(default)]
    pub validity_period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireflyPolicy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub extended_key_usages: Vec<String>,
    #[serde(default)]
    pub key_algorithm: KeyAlgorithm,
    #[serde(default)]
    pub key_usages: Vec<String>,
    #[serde(default)]
    pub sans: Sans,
    #[serde(default)]
    pub subject: PolicySubject,
    #[serde(default)]
    pub validity_period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAlgorithm {
    #[serde(default)]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub default_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sans {
    #[serde(default)]
    pub dns_names: PolicyDetails,
    #[serde(default)]
    pub ip_addresses: PolicyDetails,
    #[serde(rename = "rfc822Names", default)]
    pub rfc822_names: PolicyDetails,
    #[serde(rename = "uniformResourceIdentifiers", default)]
    pub uris: PolicyDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySubject {
    #[serde(default)]
    pub common_name: PolicyDetails,
    #[serde(default)]
    pub country: PolicyDetails,
    #[serde(default)]
    pub locality: PolicyDetails,
    #[serde(default)]
    pub organization: PolicyDetails,
    #[serde(default)]
    pub organizational_unit: PolicyDetails,
    #[serde(default)]
    pub state_or_province: PolicyDetails,
}

/// Constraint on one subject or SAN field. `type` is one of `IGNORED`,
/// `FORBIDDEN`, `OPTIONAL` or `REQUIRED`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDetails {
    #[serde(default)]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub default_values: Vec<String>,
    #[serde(default)]
    pub max_occurrences: i32,
    #[serde(default)]
    pub min_occurrences: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Identified for FireflyConfig {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for FireflySubCaProvider {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for FireflyPolicy {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Client {
    /// Create a Firefly configuration
    pub async fn create_firefly_config(&self, config: &FireflyConfig) -> Result<FireflyConfig> {
        tracing::info!("Creating Firefly configuration {}", config.name);
        let raw = self.post(CONFIGURATIONS_PATH, config).await?;
        decode_identified(&raw, "create a Firefly configuration")
    }

    /// Get a Firefly configuration by id
    pub async fn get_firefly_config(&self, id: &str) -> Result<FireflyConfig> {
        let raw = self.get(&format!("{}/{}", CONFIGURATIONS_PATH, id)).await?;
        decode_identified(&raw, "find a Firefly configuration")
    }

    /// Update a Firefly configuration
    pub async fn update_firefly_config(&self, config: &FireflyConfig) -> Result<()> {
        require_non_empty(&config.id)?;
        tracing::info!("Updating Firefly configuration {}", config.id);
        let body = FireflyConfig {
            id: String::new(),
            ..config.clone()
        };
        let raw = self
            .patch(&format!("{}/{}", CONFIGURATIONS_PATH, config.id), &body)
            .await?;
        expect_status(&raw, &[200, 202], "update Firefly configuration")
    }

    /// Delete a Firefly configuration
    pub async fn delete_firefly_config(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting Firefly configuration {}", id);
        let raw = self.delete(&format!("{}/{}", CONFIGURATIONS_PATH, id)).await?;
        expect_status(&raw, &[200], "delete Firefly configuration")
    }

    /// Create a Firefly sub-CA provider
    pub async fn create_firefly_subca_provider(
        &self,
        provider: &FireflySubCaProvider,
    ) -> Result<FireflySubCaProvider> {
        tracing::info!("Creating Firefly sub-CA provider {}", provider.name);
        let raw = self.post(SUBCA_PROVIDERS_PATH, provider).await?;
        decode_identified(&raw, "create a Firefly sub-CA provider")
    }

    /// Get a Firefly sub-CA provider by id
    pub async fn get_firefly_subca_provider(&self, id: &str) -> Result<FireflySubCaProvider> {
        let raw = self.get(&format!("{}/{}", SUBCA_PROVIDERS_PATH, id)).await?;
        decode_identified(&raw, "find a Firefly sub-CA provider")
    }

    /// Update a Firefly sub-CA provider
    pub async fn update_firefly_subca_provider(&self, provider: &FireflySubCaProvider) -> Result<()> {
        require_non_empty(&provider.id)?;
        tracing::info!("Updating Firefly sub-CA provider {}", provider.id);
        let body = FireflySubCaProvider {
            id: String::new(),
            ..provider.clone()
        };
        let raw = self
            .patch(&format!("{}/{}", SUBCA_PROVIDERS_PATH, provider.id), &body)
            .await?;
        expect_status(&raw, &[200, 202], "update Firefly sub-CA provider")
    }

    /// Delete a Firefly sub-CA provider
    pub async fn delete_firefly_subca_provider(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting Firefly sub-CA provider {}", id);
        let raw = self.delete(&format!("{}/{}", SUBCA_PROVIDERS_PATH, id)).await?;
        expect_status(&raw, &[200], "delete Firefly sub-CA provider")
    }

    /// Create a Firefly policy
    pub async fn create_firefly_policy(&self, policy: &FireflyPolicy) -> Result<FireflyPolicy> {
        tracing::info!("Creating Firefly policy {}", policy.name);
        let raw = self.post(POLICIES_PATH, policy).await?;
        decode_identified(&raw, "create a Firefly policy")
    }

    /// Get a Firefly policy by id
    pub async fn get_firefly_policy(&self, id: &str) -> Result<FireflyPolicy> {
        let raw = self.get(&format!("{}/{}", POLICIES_PATH, id)).await?;
        decode_identified(&raw, "find a Firefly policy")
    }

    /// Update a Firefly policy
    pub async fn update_firefly_policy(&self, policy: &FireflyPolicy) -> Result<()> {
        require_non_empty(&policy.id)?;
        tracing::info!("Updating Firefly policy {}", policy.id);
        let body = FireflyPolicy {
            id: String::new(),
            ..policy.clone()
        };
        let raw = self
            .patch(&format!("{}/{}", POLICIES_PATH, policy.id), &body)
            .await?;
        expect_status(&raw, &[200, 202], "update Firefly policy")
    }

    /// Delete a Firefly policy
    pub async fn delete_firefly_policy(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting Firefly policy {}", id);
        let raw = self.delete(&format!("{}/{}", POLICIES_PATH, id)).await?;
        expect_status(&raw, &[200], "delete Firefly policy")
    }
}
