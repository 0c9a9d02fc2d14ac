//! Plugins

use crate::client::{
    Client, Identified, decode, decode_identified, expect_status, require_id,
    require_non_empty, single,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "pluginType", default)]
    pub plugin_type: String,
    #[serde(default)]
    pub manifest: serde_json::Value,
}

impl Identified for Plugin {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Client {
    /// Create a plugin
    pub async fn create_plugin(&self, plugin: &Plugin) -> Result<Plugin> {
        tracing::info!("Creating {} plugin", plugin.plugin_type);
        let raw = self.post("/v1/plugins", plugin).await?;
        let created: Plugins = decode(&raw)?;
        let plugin = single(created.plugins, "plugins")?;
        require_id(plugin, &raw, "create a plugin")
    }

    /// Get a plugin by id
    pub async fn get_plugin(&self, id: &str) -> Result<Plugin> {
        let raw = self.get(&format!("/v1/plugins/{}", id)).await?;
        decode_identified(&raw, "find a plugin")
    }

    /// Update a plugin
    pub async fn update_plugin(&self, plugin: &Plugin) -> Result<()> {
        require_non_empty(&plugin.id)?;
        tracing::info!("Updating plugin {}", plugin.id);

        let body = Plugin {
            id: String::new(),
            ..plugin.clone()
        };
        let raw = self.patch(&format!("/v1/plugins/{}", plugin.id), &body).await?;
        expect_status(&raw, &[200], "update plugin")
    }

    /// Delete a plugin
    pub async fn delete_plugin(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting plugin {}", id);
        let raw = self.delete(&format!("/v1/plugins/{}", id)).await?;
        expect_status(&raw, &[204], "delete plugin")
    }
}

#[derive(Debug, Deserialize)]
struct Plugins {
    #[serde(default)]
    plugins: Vec<Plugin>,
}
