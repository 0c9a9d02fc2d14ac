//! Teams and team ownership

use crate::client::{
    Client, Identified, decode_identified, expect_status, require_non_empty,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub user_matching_rules: Vec<UserMatchingRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserMatchingRule {
    pub claim_name: String,
    pub operator: String,
    pub value: String,
}

impl Identified for Team {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Client {
    /// Create a team
    pub async fn create_team(&self, team: &Team) -> Result<Team> {
        tracing::info!("Creating team: {}", team.name);
        let raw = self.post("/v1/teams", team).await?;
        decode_identified(&raw, "create a team")
    }

    /// Get a team by id
    pub async fn get_team(&self, id: &str) -> Result<Team> {
        let raw = self.get(&format!("/v1/teams/{}", id)).await?;
        decode_identified(&raw, "find a team")
    }

    /// Update the base attributes (name, role, matching rules) of a team.
    /// Ownership is changed through the owner endpoints.
    pub async fn update_team(&self, team: &Team) -> Result<Team> {
        require_non_empty(&team.id)?;
        tracing::info!("Updating team {}", team.id);

        let update = UpdateTeamRequest {
            name: &team.name,
            role: &team.role,
            user_matching_rules: &team.user_matching_rules,
        };
        let raw = self.patch(&format!("/v1/teams/{}", team.id), &update).await?;
        expect_status(&raw, &[200], "update team")?;
        decode_identified(&raw, "get a team ID")
    }

    /// Add owners to a team
    pub async fn add_team_owners(&self, id: &str, owners: &[String]) -> Result<Team> {
        tracing::info!("Adding {} owner(s) to team {}", owners.len(), id);
        let raw = self
            .post(&format!("/v1/teams/{}/owners", id), &TeamOwnersRequest { owners })
            .await?;
        decode_identified(&raw, "get a team ID")
    }

    /// Remove owners from a team
    pub async fn remove_team_owners(&self, id: &str, owners: &[String]) -> Result<Team> {
        tracing::info!("Removing {} owner(s) from team {}", owners.len(), id);
        let raw = self
            .delete_with_body(&format!("/v1/teams/{}/owners", id), &TeamOwnersRequest { owners })
            .await?;
        decode_identified(&raw, "get a team ID")
    }

    /// Delete a team. The API is documented to answer 204 but answers 200,
    /// so both are accepted.
    pub async fn delete_team(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting team {}", id);
        let raw = self.delete(&format!("/v1/teams/{}", id)).await?;
        expect_status(&raw, &[200, 204], "delete team")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeamRequest<'a> {
    name: &'a str,
    role: &'a str,
    user_matching_rules: &'a [UserMatchingRule],
}

#[derive(Debug, Serialize)]
struct TeamOwnersRequest<'a> {
    owners: &'a [String],
}
