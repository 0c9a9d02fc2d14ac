//! `tlspc_user`: resolve a user id from an email address

use crate::error::Result;
use crate::resource::DataSource;
use crate::schema::{Attribute, Schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tlspc_client::TlspcApi;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserModel {
    pub id: String,
    pub email: String,
}

pub struct UserDataSource {
    api: Arc<dyn TlspcApi>,
}

impl UserDataSource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for UserDataSource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "tlspc_user"
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a user by email address")
            .with_attribute("email", Attribute::required_string())
            .with_attribute("id", Attribute::computed_string())
    }

    async fn read(&self, mut config: UserModel) -> Result<UserModel> {
        let user = self.api.get_user(&config.email).await?;
        config.id = user.id;
        Ok(config)
    }
}
