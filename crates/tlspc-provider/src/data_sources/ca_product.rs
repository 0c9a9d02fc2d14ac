//! `tlspc_ca_product`: resolve a CA product option id

use crate::error::Result;
use crate::resource::DataSource;
use crate::schema::{Attribute, Schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::TlspcApi;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaProductModel {
    pub id: String,
    #[serde(rename = "type")]
    pub ca_type: String,
    pub ca_name: String,
    pub product_option: String,
}

pub struct CaProductDataSource {
    api: Arc<dyn TlspcApi>,
}

impl CaProductDataSource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for CaProductDataSource {
    type Model = CaProductModel;

    fn type_name(&self) -> &'static str {
        "tlspc_ca_product"
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a certificate authority product option")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute(
                "type",
                Attribute::required_string().describe("CA type, e.g. BUILTIN or DIGICERT"),
            )
            .with_attribute(
                "ca_name",
                Attribute::required_string().describe("Name of the CA account"),
            )
            .with_attribute(
                "product_option",
                Attribute::required_string().describe("Name of the product option"),
            )
    }

    async fn read(&self, mut config: CaProductModel) -> Result<CaProductModel> {
        let (option, _account) = self
            .api
            .get_ca_product_option(&config.ca_type, &config.ca_name, &config.product_option)
            .await?;
        config.id = option.id;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::DynDataSource;
    use crate::testing::{FakeApi, NEW_ID};
    use serde_json::json;

    #[tokio::test]
    async fn test_lookup_passes_names() {
        let api = FakeApi::new();
        let source = CaProductDataSource::new(api.clone());
        let found = DynDataSource::read(
            &source,
            json!({"type": "BUILTIN", "ca_name": "Built-In CA", "product_option": "Default Product"}),
        )
        .await
        .unwrap();

        assert_eq!(found["id"], NEW_ID);
        assert_eq!(found["type"], "BUILTIN");
        assert_eq!(
            api.payloads("get_ca_product_option")[0],
            json!(["BUILTIN", "Built-In CA", "Default Product"])
        );
    }
}
