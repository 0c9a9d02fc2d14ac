//! Managed resource reconcilers

pub mod application;
pub mod certificate_template;
pub mod cloudprovider_gcp;
pub mod cloudprovider_gcp_validate;
pub mod firefly_config;
pub mod firefly_policy;
pub mod firefly_subca;
pub mod plugin;
pub mod registry_account;
pub mod service_account;
pub mod team;

pub use application::ApplicationResource;
pub use certificate_template::CertificateTemplateResource;
pub use cloudprovider_gcp::CloudProviderGcpResource;
pub use cloudprovider_gcp_validate::CloudProviderGcpValidateResource;
pub use firefly_config::FireflyConfigResource;
pub use firefly_policy::FireflyPolicyResource;
pub use firefly_subca::FireflySubCaResource;
pub use plugin::PluginResource;
pub use registry_account::RegistryAccountResource;
pub use service_account::ServiceAccountResource;
pub use team::TeamResource;

use std::collections::BTreeSet;

pub(crate) fn to_vec(set: &BTreeSet<String>) -> Vec<String> {
    set.iter().cloned().collect()
}

pub(crate) fn to_set(items: Vec<String>) -> BTreeSet<String> {
    items.into_iter().collect()
}
