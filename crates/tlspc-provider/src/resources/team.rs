//! `tlspc_team`
//!
//! Owners are a set. Updates send only the difference: one batched add for
//! new owners, then one batched remove for dropped ones, so the team always
//! keeps at least the owners both sides agree on. Name, role and matching
//! rules go through a separate update that is skipped when unchanged.

use super::{to_set, to_vec};
use crate::error::Result;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema, set_of_objects};
use crate::validators::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tlspc_client::{Team, TlspcApi, UserMatchingRule};

pub const ROLES: &[&str] = &[
    "SYSTEM_ADMIN",
    "PKI_ADMIN",
    "PLATFORM_ADMIN",
    "RESOURCE_OWNER",
    "GUEST",
];

pub const RULE_OPERATORS: &[&str] = &[
    "EQUALS",
    "NOT_EQUALS",
    "CONTAINS",
    "NOT_CONTAINS",
    "STARTS_WITH",
    "ENDS_WITH",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamModel {
    pub id: String,
    pub name: String,
    pub role: String,
    pub owners: BTreeSet<String>,
    pub user_matching_rules: Option<BTreeSet<MatchingRuleModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingRuleModel {
    pub claim_name: String,
    pub operator: String,
    pub value: String,
}

impl TeamModel {
    fn rules(&self) -> Vec<UserMatchingRule> {
        self.user_matching_rules
            .iter()
            .flatten()
            .map(|r| UserMatchingRule {
                claim_name: r.claim_name.clone(),
                operator: r.operator.clone(),
                value: r.value.clone(),
            })
            .collect()
    }

    fn base_changed(&self, other: &TeamModel) -> bool {
        self.name != other.name || self.role != other.role || self.rules() != other.rules()
    }
}

/// Owners to add and owners to remove when moving from `prior` to `planned`.
pub fn owner_changes(
    prior: &BTreeSet<String>,
    planned: &BTreeSet<String>,
) -> (Vec<String>, Vec<String>) {
    let add = planned.difference(prior).cloned().collect();
    let remove = prior.difference(planned).cloned().collect();
    (add, remove)
}

pub struct TeamResource {
    api: Arc<dyn TlspcApi>,
}

impl TeamResource {
    pub fn new(api: Arc<dyn TlspcApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for TeamResource {
    type Model = TeamModel;

    fn type_name(&self) -> &'static str {
        "tlspc_team"
    }

    fn schema(&self) -> Schema {
        Schema::resource("Manage a team and its owners")
            .with_attribute(
                "name",
                Attribute::required_string().describe("The name of the team"),
            )
            .with_attribute(
                "role",
                Attribute::required_string()
                    .validated(Validator::one_of(ROLES))
                    .describe("Role of the team members"),
            )
            .with_attribute(
                "owners",
                Attribute::required(Attribute::string_set())
                    .describe("IDs of users or service accounts that own the team"),
            )
            .with_attribute(
                "user_matching_rules",
                Attribute::optional(set_of_objects([
                    (
                        "claim_name",
                        Attribute::required_string().describe("SSO claim the rule acts on"),
                    ),
                    (
                        "operator",
                        Attribute::required_string().validated(Validator::one_of(RULE_OPERATORS)),
                    ),
                    ("value", Attribute::required(AttributeType::String)),
                ]))
                .describe("Rules that add members based on SSO claims"),
            )
    }

    async fn create(&self, mut plan: TeamModel) -> Result<TeamModel> {
        let team = Team {
            id: String::new(),
            name: plan.name.clone(),
            role: plan.role.clone(),
            owners: to_vec(&plan.owners),
            members: Vec::new(),
            user_matching_rules: plan.rules(),
        };
        let created = self.api.create_team(&team).await?;
        plan.id = created.id;
        Ok(plan)
    }

    async fn read(&self, mut state: TeamModel) -> Result<TeamModel> {
        let team = self.api.get_team(&state.id).await?;

        state.id = team.id;
        state.name = team.name;
        state.role = team.role;
        state.owners = to_set(team.owners);
        if !team.user_matching_rules.is_empty() || state.user_matching_rules.is_some() {
            state.user_matching_rules = Some(
                team.user_matching_rules
                    .into_iter()
                    .map(|r| MatchingRuleModel {
                        claim_name: r.claim_name,
                        operator: r.operator,
                        value: r.value,
                    })
                    .collect(),
            );
        }
        Ok(state)
    }

    async fn update(&self, state: TeamModel, mut plan: TeamModel) -> Result<TeamModel> {
        let id = state.id.clone();

        if plan.base_changed(&state) {
            let team = Team {
                id: id.clone(),
                name: plan.name.clone(),
                role: plan.role.clone(),
                user_matching_rules: plan.rules(),
                ..Default::default()
            };
            self.api.update_team(&team).await?;
        } else {
            tracing::debug!("Team {} name, role and rules unchanged", id);
        }

        let (add, remove) = owner_changes(&state.owners, &plan.owners);
        if !add.is_empty() {
            self.api.add_team_owners(&id, &add).await?;
        }
        if !remove.is_empty() {
            self.api.remove_team_owners(&id, &remove).await?;
        }

        plan.id = id;
        Ok(plan)
    }

    async fn delete(&self, state: TeamModel) -> Result<()> {
        self.api.delete_team(&state.id).await?;
        Ok(())
    }
}
