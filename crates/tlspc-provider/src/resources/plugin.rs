//! `tlspc_plugin`
//!
//! The manifest is held as a JSON string. Reads keep the stored text while
//! it is semantically equal to the server copy so formatting differences do
//! not show up as drift.

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tlspc_client::{Plugin, TlspcApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginModel {
    pub id: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    pub manifest: String,
}

fn parse_manifest(manifest: &str) -> Result<Value> {
    serde_json::from_str(manifest)
        .map_err(|e| ProviderError::InvalidConfig(format!("manifest is not valid JSON: {}", e)))
}

impl PluginModel {
    fn same_as(&self, other: &PluginModel) -> bool {
        self.plugin_type == other.plugin_type
            && match (parse_manifest(&self.manifest), parse_manifest(&other.manifest)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
    }
}

pub struct PluginResource {
    api: Arc<dyn TlspcApi>,
}

impl PluginResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for PluginResource {
    type Model = PluginModel;

    fn type_name(&self) -> &'static str {
        "tlspc_plugin"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a CA or machine plugin")
            .with_attribute(
                "type",
                Attribute::required_string().describe("Plugin type, e.g. CA or MACHINE"),
            )
            .with_attribute(
                "manifest",
                Attribute::required_string().describe("Plugin manifest as JSON"),
            )
    }

    fn preflight(&self, plan: &PluginModel) -> Result<()> {
        parse_manifest(&plan.manifest).map(|_| ())
    }

    async fn create(&self, mut plan: PluginModel) -> Result<PluginModel> {
        let plugin = Plugin {
            id: String::new(),
            plugin_type: plan.plugin_type.clone(),
            manifest: parse_manifest(&plan.manifest)?,
        };
        let created = self.api.create_plugin(&plugin).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, mut state: PluginModel) -> Result<PluginModel> {
        let plugin = self.api.get_plugin(&state.id).await?;

        state.id = plugin.id;
        state.plugin_type = plugin.plugin_type;
        let unchanged = parse_manifest(&state.manifest)
            .map(|stored| stored == plugin.manifest)
            .unwrap_or(false);
        if !unchanged {
            state.manifest = serde_json::to_string(&plugin.manifest)?;
        }
        Ok(state)
    }

    async fn update(&self, state: PluginModel, mut plan: PluginModel) -> Result<PluginModel> {
        plan.id = state.id.clone();
        if plan.same_as(&state) {
            tracing::debug!("Plugin {} unchanged", state.id);
            return Ok(plan);
        }

        let plugin = Plugin {
            id: state.id.clone(),
            plugin_type: plan.plugin_type.clone(),
            manifest: parse_manifest(&plan.manifest)?,
        };
        self.api.update_plugin(&plugin).await?;
        Ok(plan)
    }

    async fn delete(&self, state: PluginModel) -> Result<()> {
        self.api.delete_plugin(&state.id).await?;
        Ok(())
    }
}
