//! Certificate authority accounts and their product options

use crate::client::{Client, decode};
use crate::error::{Result, TlspcError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaAccount {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "key", default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaProductOption {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "productName", default)]
    pub name: String,
    #[serde(rename = "productDetails", default)]
    pub details: CaProductDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaProductDetails {
    #[serde(rename = "productTemplate", default)]
    pub template: CaProductTemplate,
}

/// Product description embedded verbatim into certificate templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaProductTemplate {
    #[serde(default)]
    pub certificate_authority: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_types: Vec<String>,
    #[serde(default)]
    pub validity_period: String,
}

const OPTION_NOT_FOUND: &str = "Specified CA product option not found.";

impl Client {
    async fn ca_accounts(&self, kind: &str) -> Result<Vec<CaAccountEntry>> {
        let raw = self
            .get(&format!("/v1/certificateauthorities/{}/accounts", kind))
            .await?;
        let accounts: CaAccounts = decode(&raw)?;
        Ok(accounts.accounts)
    }

    /// Find a product option by CA account name and option name.
    pub async fn get_ca_product_option(
        &self,
        kind: &str,
        account_name: &str,
        option_name: &str,
    ) -> Result<(CaProductOption, CaAccount)> {
        let accounts = self.ca_accounts(kind).await?;
        find_option_by_name(accounts, account_name, option_name)
            .ok_or_else(|| TlspcError::NotFound(OPTION_NOT_FOUND.to_string()))
    }

    /// Get a product option by id
    pub async fn get_ca_product_option_by_id(
        &self,
        kind: &str,
        option_id: &str,
    ) -> Result<CaProductOption> {
        let accounts = self.ca_accounts(kind).await?;
        accounts
            .into_iter()
            .flat_map(|a| a.product_options)
            .find(|o| o.id == option_id)
            .ok_or_else(|| TlspcError::NotFound(OPTION_NOT_FOUND.to_string()))
    }
}

fn find_option_by_name(
    accounts: Vec<CaAccountEntry>,
    account_name: &str,
    option_name: &str,
) -> Option<(CaProductOption, CaAccount)> {
    accounts
        .into_iter()
        .filter(|a| a.account.name == account_name)
        .find_map(|a| {
            let account = a.account;
            a.product_options
                .into_iter()
                .find(|o| o.name == option_name)
                .map(|o| (o, account))
        })
}

#[derive(Debug, Deserialize)]
struct CaAccounts {
    #[serde(default)]
    accounts: Vec<CaAccountEntry>,
}

#[derive(Debug, Deserialize)]
struct CaAccountEntry {
    account: CaAccount,
    #[serde(rename = "productOptions", default)]
    product_options: Vec<CaProductOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNTS: &str = r#"{
        "accounts": [
            {
                "account": {"id": "acc-1", "key": "Built-In CA"},
                "productOptions": [
                    {"id": "opt-1", "productName": "Default Product",
                     "productDetails": {"productTemplate": {
                        "certificateAuthority": "BUILTIN",
                        "productName": "Default Product",
                        "productTypes": ["SSL"],
                        "validityPeriod": "P90D"}}}
                ]
            },
            {
                "account": {"id": "acc-2", "key": "Other"},
                "productOptions": [{"id": "opt-2", "productName": "Default Product"}]
            }
        ]
    }"#;

    #[test]
    fn test_find_option_by_account_and_name() {
        let accounts: CaAccounts = serde_json::from_str(ACCOUNTS).unwrap();
        let (option, account) =
            find_option_by_name(accounts.accounts, "Other", "Default Product").unwrap();
        assert_eq!(option.id, "opt-2");
        assert_eq!(account.id, "acc-2");
    }

    #[test]
    fn test_product_template_decoded() {
        let accounts: CaAccounts = serde_json::from_str(ACCOUNTS).unwrap();
        let (option, _) =
            find_option_by_name(accounts.accounts, "Built-In CA", "Default Product").unwrap();
        assert_eq!(option.details.template.validity_period, "P90D");
        assert_eq!(option.details.template.product_types, vec!["SSL"]);
    }

    #[test]
    fn test_missing_option() {
        let accounts: CaAccounts = serde_json::from_str(ACCOUNTS).unwrap();
        assert!(find_option_by_name(accounts.accounts, "Built-In CA", "Nope").is_none());
    }
}
