//! Certificate issuing templates

use crate::ca_products::CaProductTemplate;
use crate::client::{
    Client, Identified, decode, decode_identified, expect_status, require_id,
    require_non_empty, single,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyType {
    pub key_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_lengths: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_curves: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTemplate {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "certificateAuthority", default)]
    pub ca_type: String,
    #[serde(rename = "certificateAuthorityProductOptionId", default)]
    pub ca_product_option_id: String,
    #[serde(default)]
    pub key_reuse: bool,
    #[serde(default)]
    pub key_types: Vec<KeyType>,
    #[serde(default)]
    pub product: CaProductTemplate,
    #[serde(default)]
    pub san_regexes: Vec<String>,
    #[serde(rename = "subjectCNRegexes", default)]
    pub subject_cn_regexes: Vec<String>,
    #[serde(rename = "subjectCValues", default)]
    pub subject_c_values: Vec<String>,
    #[serde(rename = "subjectLRegexes", default)]
    pub subject_l_regexes: Vec<String>,
    #[serde(rename = "subjectORegexes", default)]
    pub subject_o_regexes: Vec<String>,
    #[serde(rename = "subjectOURegexes", default)]
    pub subject_ou_regexes: Vec<String>,
    #[serde(rename = "subjectSTRegexes", default)]
    pub subject_st_regexes: Vec<String>,
}

impl CertificateTemplate {
    /// A permissive template: RSA 2048/3072/4096 keys and `.*` for every
    /// subject and SAN constraint.
    pub fn permissive(
        name: impl Into<String>,
        ca_type: impl Into<String>,
        ca_product_option_id: impl Into<String>,
        product: CaProductTemplate,
        key_reuse: bool,
    ) -> Self {
        let any = || vec![".*".to_string()];
        Self {
            id: String::new(),
            name: name.into(),
            ca_type: ca_type.into(),
            ca_product_option_id: ca_product_option_id.into(),
            key_reuse,
            key_types: vec![KeyType {
                key_type: "RSA".to_string(),
                key_lengths: vec![2048, 3072, 4096],
                key_curves: Vec::new(),
            }],
            product,
            san_regexes: any(),
            subject_cn_regexes: any(),
            subject_c_values: any(),
            subject_l_regexes: any(),
            subject_o_regexes: any(),
            subject_ou_regexes: any(),
            subject_st_regexes: any(),
        }
    }
}

impl Identified for CertificateTemplate {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Client {
    /// Create a certificate template
    pub async fn create_certificate_template(
        &self,
        template: &CertificateTemplate,
    ) -> Result<CertificateTemplate> {
        tracing::info!("Creating certificate template {}", template.name);
        let raw = self.post("/v1/certificateissuingtemplates", template).await?;
        let created: CertificateTemplates = decode(&raw)?;
        let template = single(created.templates, "certificate templates")?;
        require_id(template, &raw, "create a certificate template")
    }

    /// Get a certificate template by id
    pub async fn get_certificate_template(&self, id: &str) -> Result<CertificateTemplate> {
        let raw = self
            .get(&format!("/v1/certificateissuingtemplates/{}", id))
            .await?;
        decode_identified(&raw, "find a certificate template")
    }

    /// List all certificate templates
    pub async fn list_certificate_templates(&self) -> Result<Vec<CertificateTemplate>> {
        let raw = self.get("/v1/certificateissuingtemplates/").await?;
        let list: CertificateTemplates = decode(&raw)?;
        Ok(list.templates)
    }

    /// Update a certificate template
    pub async fn update_certificate_template(&self, template: &CertificateTemplate) -> Result<()> {
        require_non_empty(&template.id)?;
        tracing::info!("Updating certificate template {}", template.id);

        let body = CertificateTemplate {
            id: String::new(),
            ..template.clone()
        };
        let raw = self
            .put(
                &format!("/v1/certificateissuingtemplates/{}", template.id),
                &body,
            )
            .await?;
        expect_status(&raw, &[200, 202], "update certificate template")
    }

    /// Delete a certificate template
    pub async fn delete_certificate_template(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting certificate template {}", id);
        let raw = self
            .delete(&format!("/v1/certificateissuingtemplates/{}", id))
            .await?;
        expect_status(&raw, &[204], "delete certificate template")
    }
}

#[derive(Debug, Deserialize)]
struct CertificateTemplates {
    #[serde(rename = "certificateIssuingTemplates", default)]
    templates: Vec<CertificateTemplate>,
}
