//! Recording in-memory `TlspcApi` for reconciler tests

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tlspc_client::{
    Application, CaAccount, CaProductOption, CertificateTemplate, FireflyConfig, FireflyPolicy,
    FireflySubCaProvider, GcpProvider, Plugin, Result, ServiceAccount, Team, TlspcApi,
    TlspcError, User,
};

#[derive(Debug, Clone)]
pub struct Call {
    pub op: &'static str,
    pub payload: Value,
}

/// Records every call. Responses default to echoing the request (with a
/// generated id on create); `respond_with` overrides the reply for an
/// operation and `fail` makes the next N calls of an operation error.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<HashMap<&'static str, Value>>,
    failures: Mutex<HashMap<&'static str, usize>>,
}

pub const NEW_ID: &str = "3b2d5f0e-8c71-4c2a-b0e9-7f6a1d4c9e20";

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, op: &'static str, response: impl Serialize) {
        self.responses
            .lock()
            .unwrap()
            .insert(op, serde_json::to_value(response).unwrap());
    }

    pub fn fail(&self, op: &'static str, times: usize) {
        self.failures.lock().unwrap().insert(op, times);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    pub fn payloads(&self, op: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|c| c.op == op)
            .map(|c| c.payload)
            .collect()
    }

    fn reply<T: DeserializeOwned>(
        &self,
        op: &'static str,
        payload: impl Serialize,
        fallback: impl FnOnce() -> T,
    ) -> Result<T> {
        self.calls.lock().unwrap().push(Call {
            op,
            payload: serde_json::to_value(payload).unwrap(),
        });

        let mut failures = self.failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(TlspcError::UnexpectedStatus {
                    action: op,
                    status: 500,
                    body: "injected failure".to_string(),
                });
            }
        }
        drop(failures);

        match self.responses.lock().unwrap().get(op) {
            Some(v) => Ok(serde_json::from_value(v.clone()).unwrap()),
            None => Ok(fallback()),
        }
    }
}

#[async_trait]
impl TlspcApi for FakeApi {
    async fn get_user(&self, email: &str) -> Result<User> {
        self.reply("get_user", email, || User {
            username: email.to_string(),
            id: NEW_ID.to_string(),
        })
    }

    async fn create_team(&self, team: &Team) -> Result<Team> {
        self.reply("create_team", team, || Team {
            id: NEW_ID.to_string(),
            ..team.clone()
        })
    }

    async fn get_team(&self, id: &str) -> Result<Team> {
        self.reply("get_team", id, || Team {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_team(&self, team: &Team) -> Result<Team> {
        self.reply("update_team", team, || team.clone())
    }

    async fn add_team_owners(&self, id: &str, owners: &[String]) -> Result<Team> {
        self.reply("add_team_owners", owners, || Team {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn remove_team_owners(&self, id: &str, owners: &[String]) -> Result<Team> {
        self.reply("remove_team_owners", owners, || Team {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn delete_team(&self, id: &str) -> Result<()> {
        self.reply("delete_team", id, || ())
    }

    async fn create_service_account(&self, sa: &ServiceAccount) -> Result<ServiceAccount> {
        self.reply("create_service_account", sa, || ServiceAccount {
            id: NEW_ID.to_string(),
            ..sa.clone()
        })
    }

    async fn get_service_account(&self, id: &str) -> Result<ServiceAccount> {
        self.reply("get_service_account", id, || ServiceAccount {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_service_account(&self, sa: &ServiceAccount) -> Result<()> {
        self.reply("update_service_account", sa, || ())
    }

    async fn delete_service_account(&self, id: &str) -> Result<()> {
        self.reply("delete_service_account", id, || ())
    }

    async fn create_plugin(&self, plugin: &Plugin) -> Result<Plugin> {
        self.reply("create_plugin", plugin, || Plugin {
            id: NEW_ID.to_string(),
            ..plugin.clone()
        })
    }

    async fn get_plugin(&self, id: &str) -> Result<Plugin> {
        self.reply("get_plugin", id, || Plugin {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_plugin(&self, plugin: &Plugin) -> Result<()> {
        self.reply("update_plugin", plugin, || ())
    }

    async fn delete_plugin(&self, id: &str) -> Result<()> {
        self.reply("delete_plugin", id, || ())
    }

    async fn get_ca_product_option(
        &self,
        kind: &str,
        account_name: &str,
        option_name: &str,
    ) -> Result<(CaProductOption, CaAccount)> {
        self.reply(
            "get_ca_product_option",
            [kind, account_name, option_name],
            || {
                (
                    CaProductOption {
                        id: NEW_ID.to_string(),
                        name: option_name.to_string(),
                        ..Default::default()
                    },
                    CaAccount {
                        id: "account".to_string(),
                        name: account_name.to_string(),
                    },
                )
            },
        )
    }

    async fn get_ca_product_option_by_id(
        &self,
        kind: &str,
        option_id: &str,
    ) -> Result<CaProductOption> {
        self.reply("get_ca_product_option_by_id", [kind, option_id], || {
            CaProductOption {
                id: option_id.to_string(),
                ..Default::default()
            }
        })
    }

    async fn create_certificate_template(
        &self,
        template: &CertificateTemplate,
    ) -> Result<CertificateTemplate> {
        self.reply("create_certificate_template", template, || {
            CertificateTemplate {
                id: NEW_ID.to_string(),
                ..template.clone()
            }
        })
    }

    async fn get_certificate_template(&self, id: &str) -> Result<CertificateTemplate> {
        self.reply("get_certificate_template", id, || CertificateTemplate {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn list_certificate_templates(&self) -> Result<Vec<CertificateTemplate>> {
        self.reply("list_certificate_templates", (), Vec::new)
    }

    async fn update_certificate_template(&self, template: &CertificateTemplate) -> Result<()> {
        self.reply("update_certificate_template", template, || ())
    }

    async fn delete_certificate_template(&self, id: &str) -> Result<()> {
        self.reply("delete_certificate_template", id, || ())
    }

    async fn create_application(&self, app: &Application) -> Result<Application> {
        self.reply("create_application", app, || Application {
            id: NEW_ID.to_string(),
            ..app.clone()
        })
    }

    async fn get_application(&self, id: &str) -> Result<Application> {
        self.reply("get_application", id, || Application {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_application(&self, app: &Application) -> Result<()> {
        self.reply("update_application", app, || ())
    }

    async fn delete_application(&self, id: &str) -> Result<()> {
        self.reply("delete_application", id, || ())
    }

    async fn create_firefly_config(&self, config: &FireflyConfig) -> Result<FireflyConfig> {
        self.reply("create_firefly_config", config, || FireflyConfig {
            id: NEW_ID.to_string(),
            ..config.clone()
        })
    }

    async fn get_firefly_config(&self, id: &str) -> Result<FireflyConfig> {
        self.reply("get_firefly_config", id, || FireflyConfig {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_firefly_config(&self, config: &FireflyConfig) -> Result<()> {
        self.reply("update_firefly_config", config, || ())
    }

    async fn delete_firefly_config(&self, id: &str) -> Result<()> {
        self.reply("delete_firefly_config", id, || ())
    }

    async fn create_firefly_subca_provider(
        &self,
        provider: &FireflySubCaProvider,
    ) -> Result<FireflySubCaProvider> {
        self.reply("create_firefly_subca_provider", provider, || {
            FireflySubCaProvider {
                id: NEW_ID.to_string(),
                ..provider.clone()
            }
        })
    }

    async fn get_firefly_subca_provider(&self, id: &str) -> Result<FireflySubCaProvider> {
        self.reply("get_firefly_subca_provider", id, || FireflySubCaProvider {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_firefly_subca_provider(&self, provider: &FireflySubCaProvider) -> Result<()> {
        self.reply("update_firefly_subca_provider", provider, || ())
    }

    async fn delete_firefly_subca_provider(&self, id: &str) -> Result<()> {
        self.reply("delete_firefly_subca_provider", id, || ())
    }

    async fn create_firefly_policy(&self, policy: &FireflyPolicy) -> Result<FireflyPolicy> {
        self.reply("create_firefly_policy", policy, || FireflyPolicy {
            id: NEW_ID.to_string(),
            ..policy.clone()
        })
    }

    async fn get_firefly_policy(&self, id: &str) -> Result<FireflyPolicy> {
        self.reply("get_firefly_policy", id, || FireflyPolicy {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_firefly_policy(&self, policy: &FireflyPolicy) -> Result<()> {
        self.reply("update_firefly_policy", policy, || ())
    }

    async fn delete_firefly_policy(&self, id: &str) -> Result<()> {
        self.reply("delete_firefly_policy", id, || ())
    }

    async fn create_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider> {
        self.reply("create_gcp_provider", provider, || GcpProvider {
            id: NEW_ID.to_string(),
            issuer_url: "https://issuer.example/gcp".to_string(),
            ..provider.clone()
        })
    }

    async fn get_gcp_provider(&self, id: &str) -> Result<GcpProvider> {
        self.reply("get_gcp_provider", id, || GcpProvider {
            id: id.to_string(),
            ..Default::default()
        })
    }

    async fn update_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider> {
        self.reply("update_gcp_provider", provider, || provider.clone())
    }

    async fn delete_gcp_provider(&self, id: &str) -> Result<()> {
        self.reply("delete_gcp_provider", id, || ())
    }

    async fn validate_gcp_provider(&self, id: &str) -> Result<bool> {
        self.reply("validate_gcp_provider", id, || true)
    }

    async fn gcp_provider_validated(&self, id: &str) -> Result<bool> {
        self.reply("gcp_provider_validated", id, || true)
    }
}
