//! API abstraction consumed by the reconcilers
//!
//! [`Client`] is the production implementation. Reconcilers only see
//! `Arc<dyn TlspcApi>`, so tests can substitute an in-memory double.

use crate::applications::Application;
use crate::ca_products::{CaAccount, CaProductOption};
use crate::certificate_templates::CertificateTemplate;
use crate::client::Client;
use crate::cloud_providers::GcpProvider;
use crate::error::Result;
use crate::firefly::{FireflyConfig, FireflyPolicy, FireflySubCaProvider};
use crate::plugins::Plugin;
use crate::service_accounts::ServiceAccount;
use crate::teams::Team;
use crate::users::User;
use async_trait::async_trait;

#[async_trait]
pub trait TlspcApi: Send + Sync {
    async fn get_user(&self, email: &str) -> Result<User>;

    async fn create_team(&self, team: &Team) -> Result<Team>;
    async fn get_team(&self, id: &str) -> Result<Team>;
    async fn update_team(&self, team: &Team) -> Result<Team>;
    async fn add_team_owners(&self, id: &str, owners: &[String]) -> Result<Team>;
    async fn remove_team_owners(&self, id: &str, owners: &[String]) -> Result<Team>;
    async fn delete_team(&self, id: &str) -> Result<()>;

    async fn create_service_account(&self, sa: &ServiceAccount) -> Result<ServiceAccount>;
    async fn get_service_account(&self, id: &str) -> Result<ServiceAccount>;
    async fn update_service_account(&self, sa: &ServiceAccount) -> Result<()>;
    async fn delete_service_account(&self, id: &str) -> Result<()>;

    async fn create_plugin(&self, plugin: &Plugin) -> Result<Plugin>;
    async fn get_plugin(&self, id: &str) -> Result<Plugin>;
    async fn update_plugin(&self, plugin: &Plugin) -> Result<()>;
    async fn delete_plugin(&self, id: &str) -> Result<()>;

    async fn get_ca_product_option(
        &self,
        kind: &str,
        account_name: &str,
        option_name: &str,
    ) -> Result<(CaProductOption, CaAccount)>;
    async fn get_ca_product_option_by_id(&self, kind: &str, option_id: &str)
    -> Result<CaProductOption>;

    async fn create_certificate_template(
        &self,
        template: &CertificateTemplate,
    ) -> Result<CertificateTemplate>;
    async fn get_certificate_template(&self, id: &str) -> Result<CertificateTemplate>;
    async fn list_certificate_templates(&self) -> Result<Vec<CertificateTemplate>>;
    async fn update_certificate_template(&self, template: &CertificateTemplate) -> Result<()>;
    async fn delete_certificate_template(&self, id: &str) -> Result<()>;

    async fn create_application(&self, app: &Application) -> Result<Application>;
    async fn get_application(&self, id: &str) -> Result<Application>;
    async fn update_application(&self, app: &Application) -> Result<()>;
    async fn delete_application(&self, id: &str) -> Result<()>;

    async fn create_firefly_config(&self, config: &FireflyConfig) -> Result<FireflyConfig>;
    async fn get_firefly_config(&self, id: &str) -> Result<FireflyConfig>;
    async fn update_firefly_config(&self, config: &FireflyConfig) -> Result<()>;
    async fn delete_firefly_config(&self, id: &str) -> Result<()>;

    async fn create_firefly_subca_provider(
        &self,
        provider: &FireflySubCaProvider,
    ) -> Result<FireflySubCaProvider>;
    async fn get_firefly_subca_provider(&self, id: &str) -> Result<FireflySubCaProvider>;
    async fn update_firefly_subca_provider(&self, provider: &FireflySubCaProvider) -> Result<()>;
    async fn delete_firefly_subca_provider(&self, id: &str) -> Result<()>;

    async fn create_firefly_policy(&self, policy: &FireflyPolicy) -> Result<FireflyPolicy>;
    async fn get_firefly_policy(&self, id: &str) -> Result<FireflyPolicy>;
    async fn update_firefly_policy(&self, policy: &FireflyPolicy) -> Result<()>;
    async fn delete_firefly_policy(&self, id: &str) -> Result<()>;

    async fn create_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider>;
    async fn get_gcp_provider(&self, id: &str) -> Result<GcpProvider>;
    async fn update_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider>;
    async fn delete_gcp_provider(&self, id: &str) -> Result<()>;
    async fn validate_gcp_provider(&self, id: &str) -> Result<bool>;
    async fn gcp_provider_validated(&self, id: &str) -> Result<bool>;
}

#[async_trait]
impl TlspcApi for Client {
    async fn get_user(&self, email: &str) -> Result<User> {
        Client::get_user(self, email).await
    }

    async fn create_team(&self, team: &Team) -> Result<Team> {
        Client::create_team(self, team).await
    }

    async fn get_team(&self, id: &str) -> Result<Team> {
        Client::get_team(self, id).await
    }

    async fn update_team(&self, team: &Team) -> Result<Team> {
        Client::update_team(self, team).await
    }

    async fn add_team_owners(&self, id: &str, owners: &[String]) -> Result<Team> {
        Client::add_team_owners(self, id, owners).await
    }

    async fn remove_team_owners(&self, id: &str, owners: &[String]) -> Result<Team> {
        Client::remove_team_owners(self, id, owners).await
    }

    async fn delete_team(&self, id: &str) -> Result<()> {
        Client::delete_team(self, id).await
    }

    async fn create_service_account(&self, sa: &ServiceAccount) -> Result<ServiceAccount> {
        Client::create_service_account(self, sa).await
    }

    async fn get_service_account(&self, id: &str) -> Result<ServiceAccount> {
        Client::get_service_account(self, id).await
    }

    async fn update_service_account(&self, sa: &ServiceAccount) -> Result<()> {
        Client::update_service_account(self, sa).await
    }

    async fn delete_service_account(&self, id: &str) -> Result<()> {
        Client::delete_service_account(self, id).await
    }

    async fn create_plugin(&self, plugin: &Plugin) -> Result<Plugin> {
        Client::create_plugin(self, plugin).await
    }

    async fn get_plugin(&self, id: &str) -> Result<Plugin> {
        Client::get_plugin(self, id).await
    }

    async fn update_plugin(&self, plugin: &Plugin) -> Result<()> {
        Client::update_plugin(self, plugin).await
    }

    async fn delete_plugin(&self, id: &str) -> Result<()> {
        Client::delete_plugin(self, id).await
    }

    async fn get_ca_product_option(
        &self,
        kind: &str,
        account_name: &str,
        option_name: &str,
    ) -> Result<(CaProductOption, CaAccount)> {
        Client::get_ca_product_option(self, kind, account_name, option_name).await
    }

    async fn get_ca_product_option_by_id(
        &self,
        kind: &str,
        option_id: &str,
    ) -> Result<CaProductOption> {
        Client::get_ca_product_option_by_id(self, kind, option_id).await
    }

    async fn create_certificate_template(
        &self,
        template: &CertificateTemplate,
    ) -> Result<CertificateTemplate> {
        Client::create_certificate_template(self, template).await
    }

    async fn get_certificate_template(&self, id: &str) -> Result<CertificateTemplate> {
        Client::get_certificate_template(self, id).await
    }

    async fn list_certificate_templates(&self) -> Result<Vec<CertificateTemplate>> {
        Client::list_certificate_templates(self).await
    }

    async fn update_certificate_template(&self, template: &CertificateTemplate) -> Result<()> {
        Client::update_certificate_template(self, template).await
    }

    async fn delete_certificate_template(&self, id: &str) -> Result<()> {
        Client::delete_certificate_template(self, id).await
    }

    async fn create_application(&self, app: &Application) -> Result<Application> {
        Client::create_application(self, app).await
    }

    async fn get_application(&self, id: &str) -> Result<Application> {
        Client::get_application(self, id).await
    }

    async fn update_application(&self, app: &Application) -> Result<()> {
        Client::update_application(self, app).await
    }

    async fn delete_application(&self, id: &str) -> Result<()> {
        Client::delete_application(self, id).await
    }

    async fn create_firefly_config(&self, config: &FireflyConfig) -> Result<FireflyConfig> {
        Client::create_firefly_config(self, config).await
    }

    async fn get_firefly_config(&self, id: &str) -> Result<FireflyConfig> {
        Client::get_firefly_config(self, id).await
    }

    async fn update_firefly_config(&self, config: &FireflyConfig) -> Result<()> {
        Client::update_firefly_config(self, config).await
    }

    async fn delete_firefly_config(&self, id: &str) -> Result<()> {
        Client::delete_firefly_config(self, id).await
    }

    async fn create_firefly_subca_provider(
        &self,
        provider: &FireflySubCaProvider,
    ) -> Result<FireflySubCaProvider> {
        Client::create_firefly_subca_provider(self, provider).await
    }

    async fn get_firefly_subca_provider(&self, id: &str) -> Result<FireflySubCaProvider> {
        Client::get_firefly_subca_provider(self, id).await
    }

    async fn update_firefly_subca_provider(&self, provider: &FireflySubCaProvider) -> Result<()> {
        Client::update_firefly_subca_provider(self, provider).await
    }

    async fn delete_firefly_subca_provider(&self, id: &str) -> Result<()> {
        Client::delete_firefly_subca_provider(self, id).await
    }

    async fn create_firefly_policy(&self, policy: &FireflyPolicy) -> Result<FireflyPolicy> {
        Client::create_firefly_policy(self, policy).await
    }

    async fn get_firefly_policy(&self, id: &str) -> Result<FireflyPolicy> {
        Client::get_firefly_policy(self, id).await
    }

    async fn update_firefly_policy(&self, policy: &FireflyPolicy) -> Result<()> {
        Client::update_firefly_policy(self, policy).await
    }

    async fn delete_firefly_policy(&self, id: &str) -> Result<()> {
        Client::delete_firefly_policy(self, id).await
    }

    async fn create_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider> {
        Client::create_gcp_provider(self, provider).await
    }

    async fn get_gcp_provider(&self, id: &str) -> Result<GcpProvider> {
        Client::get_gcp_provider(self, id).await
    }

    async fn update_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider> {
        Client::update_gcp_provider(self, provider).await
    }

    async fn delete_gcp_provider(&self, id: &str) -> Result<()> {
        Client::delete_gcp_provider(self, id).await
    }

    async fn validate_gcp_provider(&self, id: &str) -> Result<bool> {
        Client::validate_gcp_provider(self, id).await
    }

    async fn gcp_provider_validated(&self, id: &str) -> Result<bool> {
        Client::gcp_provider_validated(self, id).await
    }
}
