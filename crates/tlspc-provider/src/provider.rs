//! Provider bootstrap and lifecycle dispatch
//!
//! [`TlspcProvider`] owns one API handle and every registered reconciler.
//! Callers address resources and data sources by type name and exchange
//! JSON documents; unknown type names are errors.

use crate::config::ProviderConfig;
use crate::data_sources::{CaProductDataSource, CertificateTemplateDataSource, UserDataSource};
use crate::error::{ProviderError, Result};
use crate::resource::{DynDataSource, DynResource};
use crate::resources::{
    ApplicationResource, CertificateTemplateResource, CloudProviderGcpResource,
    CloudProviderGcpValidateResource, FireflyConfigResource, FireflyPolicyResource,
    FireflySubCaResource, PluginResource, RegistryAccountResource, ServiceAccountResource,
    TeamResource,
};
use crate::schema::Schema;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tlspc_client::{Client, TlspcApi};

/// Provider type name; resource and data source names are prefixed with it.
pub const PROVIDER_NAME: &str = "tlspc";

/// Every schema the provider publishes.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

pub struct TlspcProvider {
    resources: BTreeMap<&'static str, Box<dyn DynResource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DynDataSource>>,
}

impl TlspcProvider {
    /// Resolve configuration and build the shared API client.
    pub fn configure(config: &ProviderConfig, version: &str) -> Result<Self> {
        let resolved = config.resolve()?;
        let client = Client::new(resolved.api_key, resolved.endpoint.as_deref(), version);
        tracing::info!("Configured provider against {}", client.endpoint());
        Ok(Self::with_api(Arc::new(client)))
    }

    /// Register every reconciler against `api`.
    pub fn with_api(api: Arc<dyn TlspcApi>) -> Self {
        let resources: Vec<Box<dyn DynResource>> = vec![
            Box::new(ApplicationResource::new(api.clone())),
            Box::new(CertificateTemplateResource::new(api.clone())),
            Box::new(CloudProviderGcpResource::new(api.clone())),
            Box::new(CloudProviderGcpValidateResource::new(api.clone())),
            Box::new(FireflyConfigResource::new(api.clone())),
            Box::new(FireflyPolicyResource::new(api.clone())),
            Box::new(FireflySubCaResource::new(api.clone())),
            Box::new(PluginResource::new(api.clone())),
            Box::new(RegistryAccountResource::new(api.clone())),
            Box::new(ServiceAccountResource::new(api.clone())),
            Box::new(TeamResource::new(api.clone())),
        ];
        let data_sources: Vec<Box<dyn DynDataSource>> = vec![
            Box::new(CaProductDataSource::new(api.clone())),
            Box::new(CertificateTemplateDataSource::new(api.clone())),
            Box::new(UserDataSource::new(api)),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    pub fn schemas(&self) -> ProviderSchemas {
        ProviderSchemas {
            provider: ProviderConfig::schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, r)| (name.to_string(), r.schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.to_string(), d.schema()))
                .collect(),
        }
    }

    /// Schema of a resource, or of a data source when no resource has the name.
    pub fn schema(&self, type_name: &str) -> Result<Schema> {
        if let Some(resource) = self.resources.get(type_name) {
            return Ok(resource.schema());
        }
        self.data_sources
            .get(type_name)
            .map(|d| d.schema())
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    fn resource(&self, type_name: &str) -> Result<&dyn DynResource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    pub async fn create(&self, type_name: &str, planned: Value) -> Result<Value> {
        tracing::debug!("create {}", type_name);
        self.resource(type_name)?.create(planned).await
    }

    pub async fn read(&self, type_name: &str, state: Value) -> Result<Value> {
        tracing::debug!("read {}", type_name);
        self.resource(type_name)?.read(state).await
    }

    pub async fn update(&self, type_name: &str, state: Value, planned: Value) -> Result<Value> {
        tracing::debug!("update {}", type_name);
        self.resource(type_name)?.update(state, planned).await
    }

    pub async fn delete(&self, type_name: &str, state: Value) -> Result<()> {
        tracing::debug!("delete {}", type_name);
        self.resource(type_name)?.delete(state).await
    }

    pub async fn import(&self, type_name: &str, id: &str) -> Result<Value> {
        tracing::debug!("import {} {}", type_name, id);
        self.resource(type_name)?.import(id).await
    }

    pub async fn read_data_source(&self, type_name: &str, config: Value) -> Result<Value> {
        tracing::debug!("read data source {}", type_name);
        let source = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownDataSource(type_name.to_string()))?;
        source.read(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, NEW_ID};
    use serde_json::json;

    fn provider() -> (Arc<FakeApi>, TlspcProvider) {
        let api = FakeApi::new();
        let provider = TlspcProvider::with_api(api.clone());
        (api, provider)
    }

    #[test]
    fn test_registry() {
        let (_, provider) = provider();
        let types = provider.resource_types();
        assert_eq!(types.len(), 11);
        assert!(types.iter().all(|t| t.starts_with(PROVIDER_NAME)));
        assert!(types.contains(&"tlspc_cloudprovider_gcp_validate"));
        assert_eq!(
            provider.data_source_types(),
            vec!["tlspc_ca_product", "tlspc_certificate_template", "tlspc_user"]
        );
    }

    #[test]
    fn test_schemas() {
        let (_, provider) = provider();
        let schemas = provider.schemas();
        assert!(schemas.provider.attributes["apikey"].sensitive);
        assert!(schemas.resources["tlspc_team"].attributes.contains_key("owners"));
        assert!(schemas.data_sources["tlspc_user"].attributes.contains_key("email"));

        // Both a resource and a data source; the resource wins.
        let schema = provider.schema("tlspc_certificate_template").unwrap();
        assert!(schema.attributes.contains_key("key_reuse"));
        assert!(provider.schema("tlspc_nothing").is_err());
    }

    #[tokio::test]
    async fn test_unknown_types() {
        let (api, provider) = provider();
        let err = provider.create("tlspc_nothing", json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
        let err = provider
            .read_data_source("tlspc_team", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownDataSource(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_dispatch() {
        let (api, provider) = provider();
        let state = provider
            .create(
                "tlspc_team",
                json!({
                    "name": "platform",
                    "role": "PLATFORM_ADMIN",
                    "owners": ["0f6a7c1e-5b1d-4c3e-9a8f-2d4b6e8a0c1f"]
                }),
            )
            .await
            .unwrap();
        assert_eq!(state["id"], NEW_ID);
        assert_eq!(api.ops(), vec!["create_team"]);
    }

    #[tokio::test]
    async fn test_validation_blocks_dispatch() {
        let (api, provider) = provider();
        let err = provider
            .create("tlspc_team", json!({"name": "platform"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_import_reads_back() {
        let (api, provider) = provider();
        let state = provider.import("tlspc_plugin", "p-1").await.unwrap();
        assert_eq!(state["id"], "p-1");
        assert_eq!(api.ops(), vec!["get_plugin"]);
    }

    #[test]
    fn test_configure_requires_api_key() {
        temp_env::with_vars_unset(["TLSPC_APIKEY", "TLSPC_ENDPOINT"], || {
            let err = TlspcProvider::configure(&ProviderConfig::default(), "test")
                .err()
                .unwrap();
            assert!(matches!(err, ProviderError::MissingApiKey));
        });
    }
}
