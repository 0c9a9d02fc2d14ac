//! `tlspc_firefly_policy`
//!
//! A policy is a tree of constraint tables. Each subject and SAN field gets
//! a [`PolicyDetailsModel`]; the mapping to and from the API shape is
//! field-for-field so a read after create reproduces the plan.

use super::{to_set, to_vec};
use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema, object};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tlspc_client::{
    FireflyPolicy, KeyAlgorithm, PolicyDetails, PolicySubject, Sans, TlspcApi,
};

pub const CONSTRAINT_TYPES: &[&str] = &["IGNORED", "FORBIDDEN", "OPTIONAL", "REQUIRED"];

pub const KEY_ALGORITHMS: &[&str] = &[
    "RSA_2048",
    "RSA_3072",
    "RSA_4096",
    "EC_P256",
    "EC_P384",
    "EC_P521",
    "EC_ED25519",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireflyPolicyModel {
    pub id: String,
    pub name: String,
    pub extended_key_usages: BTreeSet<String>,
    pub key_usages: BTreeSet<String>,
    pub validity_period: String,
    pub key_algorithm: KeyAlgorithmModel,
    pub sans: SansModel,
    pub subject: SubjectModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyAlgorithmModel {
    pub allowed_values: BTreeSet<String>,
    pub default_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDetailsModel {
    pub allowed_values: BTreeSet<String>,
    pub default_values: BTreeSet<String>,
    pub max_occurrences: i32,
    pub min_occurrences: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SansModel {
    pub dns_names: PolicyDetailsModel,
    pub ip_addresses: PolicyDetailsModel,
    pub rfc822_names: PolicyDetailsModel,
    pub uris: PolicyDetailsModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectModel {
    pub common_name: PolicyDetailsModel,
    pub country: PolicyDetailsModel,
    pub locality: PolicyDetailsModel,
    pub organization: PolicyDetailsModel,
    pub organizational_unit: PolicyDetailsModel,
    pub state_or_province: PolicyDetailsModel,
}

impl From<&PolicyDetailsModel> for PolicyDetails {
    fn from(m: &PolicyDetailsModel) -> Self {
        PolicyDetails {
            allowed_values: to_vec(&m.allowed_values),
            default_values: to_vec(&m.default_values),
            max_occurrences: m.max_occurrences,
            min_occurrences: m.min_occurrences,
            kind: m.kind.clone(),
        }
    }
}

impl From<PolicyDetails> for PolicyDetailsModel {
    fn from(d: PolicyDetails) -> Self {
        PolicyDetailsModel {
            allowed_values: to_set(d.allowed_values),
            default_values: to_set(d.default_values),
            max_occurrences: d.max_occurrences,
            min_occurrences: d.min_occurrences,
            kind: d.kind,
        }
    }
}

impl FireflyPolicyModel {
    pub fn to_policy(&self, id: &str) -> FireflyPolicy {
        FireflyPolicy {
            id: id.to_string(),
            name: self.name.clone(),
            extended_key_usages: to_vec(&self.extended_key_usages),
            key_algorithm: KeyAlgorithm {
                allowed_values: to_vec(&self.key_algorithm.allowed_values),
                default_value: self.key_algorithm.default_value.clone(),
            },
            key_usages: to_vec(&self.key_usages),
            sans: Sans {
                dns_names: (&self.sans.dns_names).into(),
                ip_addresses: (&self.sans.ip_addresses).into(),
                rfc822_names: (&self.sans.rfc822_names).into(),
                uris: (&self.sans.uris).into(),
            },
            subject: PolicySubject {
                common_name: (&self.subject.common_name).into(),
                country: (&self.subject.country).into(),
                locality: (&self.subject.locality).into(),
                organization: (&self.subject.organization).into(),
                organizational_unit: (&self.subject.organizational_unit).into(),
                state_or_province: (&self.subject.state_or_province).into(),
            },
            validity_period: self.validity_period.clone(),
        }
    }

    pub fn from_policy(policy: FireflyPolicy) -> Self {
        FireflyPolicyModel {
            id: policy.id,
            name: policy.name,
            extended_key_usages: to_set(policy.extended_key_usages),
            key_usages: to_set(policy.key_usages),
            validity_period: policy.validity_period,
            key_algorithm: KeyAlgorithmModel {
                allowed_values: to_set(policy.key_algorithm.allowed_values),
                default_value: policy.key_algorithm.default_value,
            },
            sans: SansModel {
                dns_names: policy.sans.dns_names.into(),
                ip_addresses: policy.sans.ip_addresses.into(),
                rfc822_names: policy.sans.rfc822_names.into(),
                uris: policy.sans.uris.into(),
            },
            subject: SubjectModel {
                common_name: policy.subject.common_name.into(),
                country: policy.subject.country.into(),
                locality: policy.subject.locality.into(),
                organization: policy.subject.organization.into(),
                organizational_unit: policy.subject.organizational_unit.into(),
                state_or_province: policy.subject.state_or_province.into(),
            },
        }
    }
}

fn constraint() -> Attribute {
    Attribute::required(object([
        (
            "allowed_values",
            Attribute::required(Attribute::string_set())
                .describe("Literal values or regular expressions prefixed with '^'"),
        ),
        ("default_values", Attribute::optional(Attribute::string_set())),
        ("max_occurrences", Attribute::required(AttributeType::Int32)),
        ("min_occurrences", Attribute::required(AttributeType::Int32)),
        (
            "type",
            Attribute::required_string().validated(Validator::one_of(CONSTRAINT_TYPES)),
        ),
    ]))
}

pub struct FireflyPolicyResource {
    api: Arc<dyn TlspcApi>,
}

impl FireflyPolicyResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for FireflyPolicyResource {
    type Model = FireflyPolicyModel;

    fn type_name(&self) -> &'static str {
        "tlspc_firefly_policy"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a Firefly issuance policy")
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "extended_key_usages",
                Attribute::required(Attribute::string_set())
                    .describe("Extended key usages, e.g. SERVER_AUTH, CLIENT_AUTH"),
            )
            .with_attribute(
                "key_usages",
                Attribute::required(Attribute::string_set())
                    .describe("Key usages, e.g. digitalSignature, keyEncipherment"),
            )
            .with_attribute(
                "validity_period",
                Attribute::required_string().describe("ISO 8601 period, e.g. P30D"),
            )
            .with_attribute(
                "key_algorithm",
                Attribute::required(object([
                    (
                        "allowed_values",
                        Attribute::required(Attribute::string_set())
                            .validated(Validator::each(Validator::one_of(KEY_ALGORITHMS))),
                    ),
                    (
                        "default_value",
                        Attribute::required_string().validated(Validator::one_of(KEY_ALGORITHMS)),
                    ),
                ])),
            )
            .with_attribute(
                "sans",
                Attribute::optional(object([
                    ("dns_names", constraint()),
                    ("ip_addresses", constraint()),
                    ("rfc822_names", constraint()),
                    ("uris", constraint()),
                ]))
                .describe("Subject alternative name constraints"),
            )
            .with_attribute(
                "subject",
                Attribute::optional(object([
                    ("common_name", constraint()),
                    ("country", constraint()),
                    ("locality", constraint()),
                    ("organization", constraint()),
                    ("organizational_unit", constraint()),
                    ("state_or_province", constraint()),
                ]))
                .describe("Subject field constraints"),
            )
    }

    async fn create(&self, mut plan: FireflyPolicyModel) -> Result<FireflyPolicyModel> {
        let created = self.api.create_firefly_policy(&plan.to_policy("")).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, state: FireflyPolicyModel) -> Result<FireflyPolicyModel> {
        let policy = self.api.get_firefly_policy(&state.id).await?;
        Ok(FireflyPolicyModel::from_policy(policy))
    }

    async fn update(
        &self,
        state: FireflyPolicyModel,
        mut plan: FireflyPolicyModel,
    ) -> Result<FireflyPolicyModel> {
        plan.id = state.id.clone();
        if plan == state {
            tracing::debug!("Firefly policy {} unchanged", state.id);
            return Ok(plan);
        }
        self.api
            .update_firefly_policy(&plan.to_policy(&state.id))
            .await?;
        Ok(plan)
    }

    async fn delete(&self, state: FireflyPolicyModel) -> Result<()> {
        self.api.delete_firefly_policy(&state.id).await?;
        Ok(())
    }
}
