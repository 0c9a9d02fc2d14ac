//! `tlspc_certificate_template`: find a template by name and CA type

use crate::error::Result;
use crate::resource::DataSource;
use crate::schema::{Attribute, AttributeType, Schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::{TlspcApi, TlspcError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateTemplateLookup {
    pub id: String,
    pub name: String,
    pub ca_type: String,
    pub ca_product_id: String,
    pub key_reuse: bool,
}

pub struct CertificateTemplateDataSource {
    api: Arc<dyn TlspcApi>,
}

impl CertificateTemplateDataSource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for CertificateTemplateDataSource {
    type Model = CertificateTemplateLookup;

    fn type_name(&self) -> &'static str {
        "tlspc_certificate_template"
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a certificate issuing template")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "ca_type",
                Attribute::required_string().describe("Certificate authority type"),
            )
            .with_attribute("ca_product_id", Attribute::computed_string())
            .with_attribute("key_reuse", Attribute::computed(AttributeType::Bool))
    }

    async fn read(&self, config: CertificateTemplateLookup) -> Result<CertificateTemplateLookup> {
        let templates = self.api.list_certificate_templates().await?;
        tracing::debug!("Scanning {} certificate templates", templates.len());

        let template = templates
            .into_iter()
            .find(|t| t.name == config.name && t.ca_type == config.ca_type)
            .ok_or_else(|| TlspcError::NotFound("Certificate Template not found".to_string()))?;

        Ok(CertificateTemplateLookup {
            id: template.id,
            ca_product_id: template.ca_product_option_id,
            key_reuse: template.key_reuse,
            ..config
        })
    }
}
