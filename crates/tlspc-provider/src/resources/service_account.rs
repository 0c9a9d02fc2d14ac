//! `tlspc_service_account`
//!
//! The flat configuration is parsed into a [`ServiceAccountShape`] before
//! anything is sent. Key-agent fields and federated-issuer fields are
//! mutually exclusive; at least one group must be present.

use super::{to_set, to_vec};
use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tlspc_client::service_accounts::{AUTH_OCI_TOKEN, AUTH_RSA_KEY, AUTH_RSA_KEY_FEDERATED};
use tlspc_client::{ServiceAccount, TlspcApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccountModel {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub scopes: BTreeSet<String>,
    pub public_key: Option<String>,
    pub credential_lifetime: Option<i32>,
    pub jwks_uri: Option<String>,
    pub issuer_url: Option<String>,
    pub audience: Option<String>,
    pub subject: Option<String>,
    pub applications: Option<BTreeSet<String>>,
}

/// The three configurations one service account object can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAccountShape {
    KeyAgent {
        public_key: String,
        credential_lifetime: i32,
    },
    FederatedIssuer {
        jwks_uri: String,
        issuer_url: String,
        audience: String,
        subject: String,
        applications: Vec<String>,
    },
    RegistryToken {
        credential_lifetime: i32,
    },
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl ServiceAccountShape {
    pub fn parse(model: &ServiceAccountModel) -> Result<Self> {
        let public_key = text(&model.public_key);
        let lifetime = model.credential_lifetime.unwrap_or(0);
        let applications: Vec<String> = model.applications.iter().flatten().cloned().collect();

        let key_agent = !public_key.is_empty() || lifetime > 0;
        let federated = [
            &model.jwks_uri,
            &model.issuer_url,
            &model.audience,
            &model.subject,
        ]
        .iter()
        .any(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
            || !applications.is_empty();

        match (key_agent, federated) {
            (true, true) => Err(ProviderError::InvalidConfig(
                "service account has both public_key and jwks fields present".to_string(),
            )),
            (false, false) => Err(ProviderError::InvalidConfig(
                "service account has neither public_key or jwks fields present".to_string(),
            )),
            (true, false) => Ok(ServiceAccountShape::KeyAgent {
                public_key,
                credential_lifetime: lifetime,
            }),
            (false, true) => Ok(ServiceAccountShape::FederatedIssuer {
                jwks_uri: text(&model.jwks_uri),
                issuer_url: text(&model.issuer_url),
                audience: text(&model.audience),
                subject: text(&model.subject),
                applications,
            }),
        }
    }

    pub fn authentication_type(&self) -> &'static str {
        match self {
            ServiceAccountShape::KeyAgent { .. } => AUTH_RSA_KEY,
            ServiceAccountShape::FederatedIssuer { .. } => AUTH_RSA_KEY_FEDERATED,
            ServiceAccountShape::RegistryToken { .. } => AUTH_OCI_TOKEN,
        }
    }

    /// Request body for this shape on top of the common fields.
    pub fn to_request(&self, id: &str, name: &str, owner: &str, scopes: Vec<String>) -> ServiceAccount {
        let mut sa = ServiceAccount {
            id: id.to_string(),
            name: name.to_string(),
            owner: owner.to_string(),
            scopes,
            authentication_type: self.authentication_type().to_string(),
            ..Default::default()
        };
        match self {
            ServiceAccountShape::KeyAgent {
                public_key,
                credential_lifetime,
            } => {
                sa.public_key = public_key.clone();
                sa.credential_lifetime = *credential_lifetime;
            }
            ServiceAccountShape::FederatedIssuer {
                jwks_uri,
                issuer_url,
                audience,
                subject,
                applications,
            } => {
                sa.jwks_uri = jwks_uri.clone();
                sa.issuer_url = issuer_url.clone();
                sa.audience = audience.clone();
                sa.subject = subject.clone();
                sa.applications = applications.clone();
            }
            ServiceAccountShape::RegistryToken {
                credential_lifetime,
            } => {
                sa.credential_lifetime = *credential_lifetime;
            }
        }
        sa
    }
}

/// Replace a stored optional string only when the remote value differs.
/// An empty remote value against an unset local one stays unset.
fn refresh(local: &mut Option<String>, remote: String) {
    if local.as_deref().unwrap_or("") != remote {
        *local = (!remote.is_empty()).then_some(remote);
    }
}

pub struct ServiceAccountResource {
    api: Arc<dyn TlspcApi>,
}

impl ServiceAccountResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for ServiceAccountResource {
    type Model = ServiceAccountModel;

    fn type_name(&self) -> &'static str {
        "tlspc_service_account"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a service account for an agent or a federated workload")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "owner",
                Attribute::required_string()
                    .validated(Validator::Uuid)
                    .describe("ID of the team that owns this service account"),
            )
            .with_attribute(
                "scopes",
                Attribute::required(Attribute::string_set())
                    .describe("Scopes granted to this service account"),
            )
            .with_attribute(
                "public_key",
                Attribute::optional_string().describe("Public key for key-based agents"),
            )
            .with_attribute(
                "credential_lifetime",
                Attribute::optional(AttributeType::Int32)
                    .describe("Credential lifetime in days"),
            )
            .with_attribute("jwks_uri", Attribute::optional_string())
            .with_attribute("issuer_url", Attribute::optional_string())
            .with_attribute("audience", Attribute::optional_string())
            .with_attribute("subject", Attribute::optional_string())
            .with_attribute(
                "applications",
                Attribute::optional(Attribute::string_set())
                    .validated(Validator::each(Validator::Uuid))
                    .describe("Application IDs a federated issuer may request for"),
            )
    }

    fn preflight(&self, plan: &ServiceAccountModel) -> Result<()> {
        ServiceAccountShape::parse(plan).map(|_| ())
    }

    async fn create(&self, mut plan: ServiceAccountModel) -> Result<ServiceAccountModel> {
        let shape = ServiceAccountShape::parse(&plan)?;
        let request = shape.to_request("", &plan.name, &plan.owner, to_vec(&plan.scopes));
        let created = self.api.create_service_account(&request).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, mut state: ServiceAccountModel) -> Result<ServiceAccountModel> {
        let sa = self.api.get_service_account(&state.id).await?;

        state.id = sa.id;
        state.name = sa.name;
        state.owner = sa.owner;
        state.scopes = to_set(sa.scopes);
        refresh(&mut state.public_key, sa.public_key);
        if state.credential_lifetime.unwrap_or(0) != sa.credential_lifetime {
            state.credential_lifetime = (sa.credential_lifetime != 0).then_some(sa.credential_lifetime);
        }
        refresh(&mut state.jwks_uri, sa.jwks_uri);
        refresh(&mut state.issuer_url, sa.issuer_url);
        refresh(&mut state.audience, sa.audience);
        refresh(&mut state.subject, sa.subject);
        let remote_apps = to_set(sa.applications);
        if state.applications.clone().unwrap_or_default() != remote_apps {
            state.applications = (!remote_apps.is_empty()).then_some(remote_apps);
        }
        Ok(state)
    }

    async fn update(
        &self,
        state: ServiceAccountModel,
        mut plan: ServiceAccountModel,
    ) -> Result<ServiceAccountModel> {
        let shape = ServiceAccountShape::parse(&plan)?;
        if let Ok(previous) = ServiceAccountShape::parse(&state) {
            if previous.authentication_type() != shape.authentication_type() {
                return Err(ProviderError::InvalidConfig(format!(
                    "cannot change service account from {} to {}; replace it instead",
                    previous.authentication_type(),
                    shape.authentication_type()
                )));
            }
        }

        plan.id = state.id.clone();
        if plan == state {
            tracing::debug!("Service account {} unchanged", state.id);
            return Ok(plan);
        }

        let mut request = shape.to_request(&state.id, &plan.name, &plan.owner, to_vec(&plan.scopes));
        if let ServiceAccountShape::FederatedIssuer { .. } = shape {
            // issuer and subject are only accepted when they actually change
            if state.issuer_url == plan.issuer_url {
                request.issuer_url.clear();
            }
            if state.subject == plan.subject {
                request.subject.clear();
            }
        }
        self.api.update_service_account(&request).await?;
        Ok(plan)
    }

    async fn delete(&self, state: ServiceAccountModel) -> Result<()> {
        self.api.delete_service_account(&state.id).await?;
        Ok(())
    }
}
