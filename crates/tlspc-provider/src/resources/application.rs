//! `tlspc_application`
//!
//! Owners are `{type, owner}` pairs where type is `USER` or `TEAM`.
//! Deleting an application that still references certificate templates can
//! fail; the delete then clears the template aliases and tries once more.

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tlspc_client::{Application, OwnerAndType, TlspcApi};

pub const OWNER_TYPES: &[&str] = &["USER", "TEAM"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationModel {
    pub id: String,
    pub name: String,
    pub owners: BTreeSet<BTreeMap<String, String>>,
    pub ca_template_aliases: BTreeMap<String, String>,
}

/// Convert declared owners to the API form, rejecting unknown types and
/// empty identifiers.
pub fn encode_owners(owners: &BTreeSet<BTreeMap<String, String>>) -> Result<Vec<OwnerAndType>> {
    owners
        .iter()
        .map(|entry| {
            let kind = entry.get("type").map(String::as_str).unwrap_or("");
            let id = entry.get("owner").map(String::as_str).unwrap_or("");
            if !OWNER_TYPES.contains(&kind) {
                return Err(ProviderError::InvalidConfig(format!(
                    "unsupported owner type: {:?}",
                    kind
                )));
            }
            if id.is_empty() {
                return Err(ProviderError::InvalidConfig("undefined owner".to_string()));
            }
            Ok(OwnerAndType {
                id: id.to_string(),
                owner_type: kind.to_string(),
            })
        })
        .collect()
}

fn decode_owners(owners: Vec<OwnerAndType>) -> BTreeSet<BTreeMap<String, String>> {
    owners
        .into_iter()
        .map(|o| {
            BTreeMap::from([
                ("type".to_string(), o.owner_type),
                ("owner".to_string(), o.id),
            ])
        })
        .collect()
}

pub struct ApplicationResource {
    api: Arc<dyn TlspcApi>,
}

impl ApplicationResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }

    fn request(id: &str, model: &ApplicationModel) -> Result<Application> {
        Ok(Application {
            id: id.to_string(),
            name: model.name.clone(),
            owners: encode_owners(&model.owners)?,
            certificate_templates: model.ca_template_aliases.clone(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Resource for ApplicationResource {
    type Model = ApplicationModel;

    fn type_name(&self) -> &'static str {
        "tlspc_application"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage an application")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "owners",
                Attribute::required(AttributeType::Set {
                    element: Box::new(Attribute::string_map()),
                })
                .describe("Owners as {type = USER|TEAM, owner = id}"),
            )
            .with_attribute(
                "ca_template_aliases",
                Attribute::required(Attribute::string_map())
                    .describe("Certificate template alias to template id"),
            )
    }

    fn preflight(&self, plan: &ApplicationModel) -> Result<()> {
        encode_owners(&plan.owners).map(|_| ())
    }

    async fn create(&self, mut plan: ApplicationModel) -> Result<ApplicationModel> {
        let created = self.api.create_application(&Self::request("", &plan)?).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, mut state: ApplicationModel) -> Result<ApplicationModel> {
        let app = self.api.get_application(&state.id).await?;
        state.id = app.id;
        state.name = app.name;
        state.owners = decode_owners(app.owners);
        state.ca_template_aliases = app.certificate_templates;
        Ok(state)
    }

    async fn update(
        &self,
        state: ApplicationModel,
        mut plan: ApplicationModel,
    ) -> Result<ApplicationModel> {
        plan.id = state.id.clone();
        if plan == state {
            tracing::debug!("Application {} unchanged", state.id);
            return Ok(plan);
        }
        self.api
            .update_application(&Self::request(&state.id, &plan)?)
            .await?;
        Ok(plan)
    }

    async fn delete(&self, state: ApplicationModel) -> Result<()> {
        let Err(first) = self.api.delete_application(&state.id).await else {
            return Ok(());
        };
        tracing::warn!(
            "Deleting application {} failed ({}); clearing template aliases and retrying",
            state.id,
            first
        );

        let cleared = ApplicationModel {
            ca_template_aliases: BTreeMap::new(),
            ..state.clone()
        };
        self.api
            .update_application(&Self::request(&state.id, &cleared)?)
            .await?;
        self.api.delete_application(&state.id).await?;
        Ok(())
    }
}
