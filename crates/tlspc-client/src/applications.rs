//! Applications (outage detection service)

use crate::client::{
    Client, Identified, decode, decode_identified, expect_status, require_id,
    require_non_empty, single,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const APPLICATIONS_PATH: &str = "/outagedetection/v1/applications";

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerAndType {
    #[serde(rename = "ownerId")]
    pub id: String,
    #[serde(rename = "ownerType")]
    pub owner_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "ownerIdsAndTypes", default)]
    pub owners: Vec<OwnerAndType>,
    /// Template alias to certificate template id.
    #[serde(rename = "certificateIssuingTemplateAliasIdMap", default)]
    pub certificate_templates: BTreeMap<String, String>,
    #[serde(default)]
    pub fqdns: Vec<String>,
    #[serde(rename = "internalPorts", default)]
    pub internal_ports: Vec<String>,
    #[serde(rename = "ipRanges", default)]
    pub ip_ranges: Vec<String>,
    #[serde(default)]
    pub ports: Vec<String>,
}

impl Identified for Application {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Client {
    /// Create an application
    pub async fn create_application(&self, app: &Application) -> Result<Application> {
        tracing::info!("Creating application {}", app.name);
        let raw = self.post(APPLICATIONS_PATH, app).await?;
        let created: Applications = decode(&raw)?;
        let app = single(created.applications, "applications")?;
        require_id(app, &raw, "create an application")
    }

    /// Get an application by id
    pub async fn get_application(&self, id: &str) -> Result<Application> {
        let raw = self.get(&format!("{}/{}", APPLICATIONS_PATH, id)).await?;
        decode_identified(&raw, "find an application")
    }

    /// Update an application
    pub async fn update_application(&self, app: &Application) -> Result<()> {
        require_non_empty(&app.id)?;
        tracing::info!("Updating application {}", app.id);

        let body = Application {
            id: String::new(),
            ..app.clone()
        };
        let raw = self
            .put(&format!("{}/{}", APPLICATIONS_PATH, app.id), &body)
            .await?;
        expect_status(&raw, &[200, 202], "update application")
    }

    /// Delete an application
    pub async fn delete_application(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting application {}", id);
        let raw = self.delete(&format!("{}/{}", APPLICATIONS_PATH, id)).await?;
        expect_status(&raw, &[200], "delete application")
    }
}

#[derive(Debug, Deserialize)]
struct Applications {
    #[serde(default)]
    applications: Vec<Application>,
}
