//! `tlspc_certificate_template`
//!
//! Only a subset of template settings is exposed. Every subject and SAN
//! constraint is `.*` and the allowed keys are RSA 2048/3072/4096.

use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::{CertificateTemplate, TlspcApi};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateTemplateModel {
    pub id: String,
    pub name: String,
    pub ca_type: String,
    pub ca_product_id: String,
    pub key_reuse: bool,
}

pub struct CertificateTemplateResource {
    api: Arc<dyn TlspcApi>,
}

impl CertificateTemplateResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }

    /// Look up the product option so its template can be embedded.
    async fn template(&self, id: &str, plan: &CertificateTemplateModel) -> Result<CertificateTemplate> {
        let option = self
            .api
            .get_ca_product_option_by_id(&plan.ca_type, &plan.ca_product_id)
            .await?;
        let mut template = CertificateTemplate::permissive(
            plan.name.clone(),
            plan.ca_type.clone(),
            plan.ca_product_id.clone(),
            option.details.template,
            plan.key_reuse,
        );
        template.id = id.to_string();
        Ok(template)
    }
}

#[async_trait]
impl Resource for CertificateTemplateResource {
    type Model = CertificateTemplateModel;

    fn type_name(&self) -> &'static str {
        "tlspc_certificate_template"
    }

    fn schema(&self) -> Schema {
        Schema::resource(
            "Manage a certificate issuing template. Subject and SAN constraints allow \
             everything and keys are limited to RSA 2048/3072/4096.",
        )
        .with_attribute("name", Attribute::required_string())
        .with_attribute(
            "ca_type",
            Attribute::required_string().describe("Certificate authority type, e.g. BUILTIN"),
        )
        .with_attribute(
            "ca_product_id",
            Attribute::required_string()
                .validated(Validator::Uuid)
                .describe("ID of a CA product option"),
        )
        .with_attribute(
            "key_reuse",
            Attribute::required(AttributeType::Bool).describe("Allow private key reuse"),
        )
    }

    async fn create(&self, mut plan: CertificateTemplateModel) -> Result<CertificateTemplateModel> {
        let template = self.template("", &plan).await?;
        let created = self.api.create_certificate_template(&template).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, mut state: CertificateTemplateModel) -> Result<CertificateTemplateModel> {
        let template = self.api.get_certificate_template(&state.id).await?;

        state.id = template.id;
        state.name = template.name;
        state.ca_type = template.ca_type;
        state.ca_product_id = template.ca_product_option_id;
        state.key_reuse = template.key_reuse;
        Ok(state)
    }

    async fn update(
        &self,
        state: CertificateTemplateModel,
        mut plan: CertificateTemplateModel,
    ) -> Result<CertificateTemplateModel> {
        plan.id = state.id.clone();
        if plan == state {
            tracing::debug!("Certificate template {} unchanged", state.id);
            return Ok(plan);
        }
        let template = self.template(&state.id, &plan).await?;
        self.api.update_certificate_template(&template).await?;
        Ok(plan)
    }

    async fn delete(&self, state: CertificateTemplateModel) -> Result<()> {
        self.api.delete_certificate_template(&state.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, NEW_ID};
    use tlspc_client::{CaProductDetails, CaProductOption, CaProductTemplate};

    const OPTION: &str = "2c4e6a8b-0d1f-4a3b-9c5d-7e9f1a3b5c7d";

    fn plan() -> CertificateTemplateModel {
        CertificateTemplateModel {
            id: String::new(),
            name: "default".into(),
            ca_type: "BUILTIN".into(),
            ca_product_id: OPTION.into(),
            key_reuse: false,
        }
    }

    #[tokio::test]
    async fn test_create_embeds_product_template() {
        let api = FakeApi::new();
        api.respond_with(
            "get_ca_product_option_by_id",
            CaProductOption {
                id: OPTION.into(),
                name: "Default Product".into(),
                details: CaProductDetails {
                    template: CaProductTemplate {
                        certificate_authority: "BUILTIN".into(),
                        product_name: "Default Product".into(),
                        product_types: vec!["SSL".into()],
                        validity_period: "P90D".into(),
                    },
                },
            },
        );
        let resource = CertificateTemplateResource::new(api.clone());
        let state = resource.create(plan()).await.unwrap();
        assert_eq!(state.id, NEW_ID);

        assert_eq!(
            api.ops(),
            vec!["get_ca_product_option_by_id", "create_certificate_template"]
        );
        let payload = &api.payloads("create_certificate_template")[0];
        assert_eq!(payload["product"]["productName"], "Default Product");
        assert_eq!(payload["certificateAuthorityProductOptionId"], OPTION);
        assert_eq!(payload["keyTypes"][0]["keyLengths"], serde_json::json!([2048, 3072, 4096]));
        assert_eq!(payload["subjectCNRegexes"], serde_json::json!([".*"]));
    }

    #[tokio::test]
    async fn test_update_skips_unchanged() {
        let api = FakeApi::new();
        let resource = CertificateTemplateResource::new(api.clone());
        let state = CertificateTemplateModel {
            id: "ct-1".into(),
            ..plan()
        };
        resource.update(state.clone(), plan()).await.unwrap();
        assert!(api.calls().is_empty());

        let planned = CertificateTemplateModel {
            key_reuse: true,
            ..plan()
        };
        resource.update(state, planned).await.unwrap();
        let payload = &api.payloads("update_certificate_template")[0];
        assert_eq!(payload["id"], "ct-1");
        assert_eq!(payload["keyReuse"], true);
    }
}
