//! GCP cloud provider integration (GraphQL)
//!
//! The API has no lookup by identifier for cloud providers, so a read lists
//! every GCP provider and scans for the requested one.

use crate::client::Client;
use crate::error::{Result, TlspcError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CONFIGURATION_FIELDS: &str = r#"
    id
    name
    team { id }
    configuration {
      __typename
      ... on CloudProviderGCPConfiguration {
        issuerUrl
        serviceAccountEmail
        projectNumber
        workloadIdentityPoolId
        workloadIdentityPoolProviderId
      }
    }
"#;

fn list_query() -> String {
    format!(
        "query GCPProviders {{ cloudProviders(filter: {{type: GCP}}) {{ nodes {{ {} }} }} }}",
        CONFIGURATION_FIELDS
    )
}

fn create_mutation() -> String {
    format!(
        r#"mutation NewGCPProvider($name: String!, $team: UUID!, $serviceAccountEmail: String!, $projectNumber: String!, $workloadIdentityPoolId: String!, $workloadIdentityPoolProviderId: String!) {{
  createCloudProvider(input: {{
    name: $name
    team: $team
    type: GCP
    authorizationMethod: WORKLOAD_IDENTITY_FEDERATION
    configuration: {{ gcp: {{
      serviceAccountEmail: $serviceAccountEmail
      projectNumber: $projectNumber
      workloadIdentityPoolId: $workloadIdentityPoolId
      workloadIdentityPoolProviderId: $workloadIdentityPoolProviderId
    }} }}
  }}) {{ {} }}
}}"#,
        CONFIGURATION_FIELDS
    )
}

fn update_mutation() -> String {
    format!(
        r#"mutation UpdateGCPProvider($id: UUID!, $name: String!, $team: UUID!, $serviceAccountEmail: String!, $projectNumber: String!, $workloadIdentityPoolId: String!, $workloadIdentityPoolProviderId: String!) {{
  updateCloudProvider(id: $id, input: {{
    name: $name
    team: $team
    configuration: {{ gcp: {{
      serviceAccountEmail: $serviceAccountEmail
      projectNumber: $projectNumber
      workloadIdentityPoolId: $workloadIdentityPoolId
      workloadIdentityPoolProviderId: $workloadIdentityPoolProviderId
    }} }}
  }}) {{ {} }}
}}"#,
        CONFIGURATION_FIELDS
    )
}

const DELETE_MUTATION: &str =
    "mutation DeleteGCPProvider($id: UUID!) { deleteCloudProvider(id: $id) { id } }";

const VALIDATE_MUTATION: &str =
    "mutation ValidateGCPProvider($id: UUID!) { validateCloudProvider(cloudProviderId: $id) { result details } }";

const DETAILS_QUERY: &str = r#"query GetGCPProviderDetails($id: UUID!) {
  cloudProviderDetails(cloudProviderId: $id) {
    __typename
    ... on GCPProviderDetails { cloudProvider { id status } }
  }
}"#;

/// A GCP workload identity federation integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GcpProvider {
    pub id: String,
    pub issuer_url: String,
    pub name: String,
    pub team: String,
    pub service_account_email: String,
    pub project_number: i64,
    pub workload_identity_pool_id: String,
    pub workload_identity_pool_provider_id: String,
}

/// Provider configuration union, discriminated by `__typename`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum CloudProviderConfiguration {
    #[serde(rename = "CloudProviderGCPConfiguration")]
    Gcp(GcpConfiguration),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpConfiguration {
    #[serde(default)]
    pub issuer_url: String,
    #[serde(default)]
    pub service_account_email: String,
    #[serde(default)]
    pub project_number: String,
    #[serde(default)]
    pub workload_identity_pool_id: String,
    #[serde(default)]
    pub workload_identity_pool_provider_id: String,
}

/// Provider details union, discriminated by `__typename`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum CloudProviderDetails {
    #[serde(rename = "GCPProviderDetails")]
    Gcp {
        #[serde(rename = "cloudProvider")]
        cloud_provider: StatusRef,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusRef {
    #[serde(default)]
    pub id: String,
    pub status: CloudProviderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudProviderStatus {
    Validated,
    NotValidated,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CloudProviderNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub team: TeamRef,
    pub configuration: CloudProviderConfiguration,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamRef {
    pub id: String,
}

impl CloudProviderNode {
    fn into_gcp(self) -> Result<GcpProvider> {
        let CloudProviderConfiguration::Gcp(cfg) = self.configuration else {
            return Err(TlspcError::UnexpectedVariant(
                "Expected GCP Configuration not found".to_string(),
            ));
        };
        let project_number = cfg.project_number.parse::<i64>().map_err(|_| {
            TlspcError::InvalidProjectNumber {
                value: cfg.project_number.clone(),
            }
        })?;

        Ok(GcpProvider {
            id: self.id,
            issuer_url: cfg.issuer_url,
            name: self.name,
            team: self.team.id,
            service_account_email: cfg.service_account_email,
            project_number,
            workload_identity_pool_id: cfg.workload_identity_pool_id,
            workload_identity_pool_provider_id: cfg.workload_identity_pool_provider_id,
        })
    }
}

/// Pick the provider with `id` out of a listing.
pub fn find_gcp_provider(nodes: Vec<CloudProviderNode>, id: &str) -> Result<GcpProvider> {
    nodes
        .into_iter()
        .find(|n| n.id == id)
        .ok_or_else(|| TlspcError::NotFound("GCP CloudProvider not found".to_string()))?
        .into_gcp()
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|source| TlspcError::InvalidId {
        value: value.to_string(),
        source,
    })
}

impl Client {
    /// Create a GCP cloud provider
    pub async fn create_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider> {
        tracing::info!("Creating GCP cloud provider {}", provider.name);
        let variables = ProviderVariables::new(None, provider)?;
        let data: CreateData = self
            .graphql("NewGCPProvider", &create_mutation(), variables)
            .await?;
        data.create_cloud_provider.into_gcp().map_err(no_config_returned)
    }

    /// Get a GCP cloud provider by id
    pub async fn get_gcp_provider(&self, id: &str) -> Result<GcpProvider> {
        let data: ListData = self
            .graphql("GCPProviders", &list_query(), serde_json::json!({}))
            .await?;
        find_gcp_provider(data.cloud_providers.nodes, id)
    }

    /// Update a GCP cloud provider
    pub async fn update_gcp_provider(&self, provider: &GcpProvider) -> Result<GcpProvider> {
        tracing::info!("Updating GCP cloud provider {}", provider.id);
        let id = parse_uuid(&provider.id)?;
        let variables = ProviderVariables::new(Some(id), provider)?;
        let data: UpdateData = self
            .graphql("UpdateGCPProvider", &update_mutation(), variables)
            .await?;
        data.update_cloud_provider.into_gcp().map_err(no_config_returned)
    }

    /// Delete a GCP cloud provider
    pub async fn delete_gcp_provider(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting GCP cloud provider {}", id);
        let id = parse_uuid(id)?;
        let _: serde_json::Value = self
            .graphql("DeleteGCPProvider", DELETE_MUTATION, IdVariables { id })
            .await?;
        Ok(())
    }

    /// Ask the service to test the federation setup. Returns whether the
    /// provider ended up validated.
    pub async fn validate_gcp_provider(&self, id: &str) -> Result<bool> {
        tracing::info!("Validating GCP cloud provider {}", id);
        let id = parse_uuid(id)?;
        let data: ValidateData = self
            .graphql("ValidateGCPProvider", VALIDATE_MUTATION, IdVariables { id })
            .await?;
        Ok(data.validate_cloud_provider.result == CloudProviderStatus::Validated)
    }

    /// Current validation status of a provider.
    pub async fn gcp_provider_validated(&self, id: &str) -> Result<bool> {
        let id = parse_uuid(id)?;
        let data: DetailsData = self
            .graphql("GetGCPProviderDetails", DETAILS_QUERY, IdVariables { id })
            .await?;
        match data.cloud_provider_details {
            CloudProviderDetails::Gcp { cloud_provider } => {
                Ok(cloud_provider.status == CloudProviderStatus::Validated)
            }
            CloudProviderDetails::Other => Err(TlspcError::UnexpectedVariant(
                "Expected GCP provider details not found".to_string(),
            )),
        }
    }
}

fn no_config_returned(err: TlspcError) -> TlspcError {
    match err {
        TlspcError::UnexpectedVariant(_) => TlspcError::UnexpectedVariant(
            "No GCP CloudProvider Configuration returned".to_string(),
        ),
        other => other,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderVariables<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    name: &'a str,
    team: Uuid,
    service_account_email: &'a str,
    project_number: String,
    workload_identity_pool_id: &'a str,
    workload_identity_pool_provider_id: &'a str,
}

impl<'a> ProviderVariables<'a> {
    fn new(id: Option<Uuid>, p: &'a GcpProvider) -> Result<Self> {
        Ok(Self {
            id,
            name: &p.name,
            team: parse_uuid(&p.team)?,
            service_account_email: &p.service_account_email,
            project_number: p.project_number.to_string(),
            workload_identity_pool_id: &p.workload_identity_pool_id,
            workload_identity_pool_provider_id: &p.workload_identity_pool_provider_id,
        })
    }
}

#[derive(Debug, Serialize)]
struct IdVariables {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    cloud_providers: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    #[serde(default)]
    nodes: Vec<CloudProviderNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    create_cloud_provider: CloudProviderNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateData {
    update_cloud_provider: CloudProviderNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateData {
    validate_cloud_provider: ValidateResult,
}

#[derive(Debug, Deserialize)]
struct ValidateResult {
    result: CloudProviderStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsData {
    cloud_provider_details: CloudProviderDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<CloudProviderNode> {
        let body = serde_json::json!({
            "cloudProviders": {"nodes": [
                {"id": "x", "name": "first", "team": {"id": "t1"}, "configuration": {
                    "__typename": "CloudProviderGCPConfiguration",
                    "issuerUrl": "https://issuer/x",
                    "serviceAccountEmail": "x@proj.iam.gserviceaccount.com",
                    "projectNumber": "111",
                    "workloadIdentityPoolId": "pool-x",
                    "workloadIdentityPoolProviderId": "prov-x"}},
                {"id": "y", "name": "second", "team": {"id": "t2"}, "configuration": {
                    "__typename": "CloudProviderGCPConfiguration",
                    "issuerUrl": "https://issuer/y",
                    "serviceAccountEmail": "y@proj.iam.gserviceaccount.com",
                    "projectNumber": "222",
                    "workloadIdentityPoolId": "pool-y",
                    "workloadIdentityPoolProviderId": "prov-y"}},
                {"id": "z", "name": "third", "team": {"id": "t3"}, "configuration": {
                    "__typename": "CloudProviderAWSConfiguration",
                    "accountId": "123"}}
            ]}
        });
        let data: ListData = serde_json::from_value(body).unwrap();
        data.cloud_providers.nodes
    }

    #[test]
    fn test_find_provider_by_id() {
        let found = find_gcp_provider(listing(), "y").unwrap();
        assert_eq!(found.name, "second");
        assert_eq!(found.team, "t2");
        assert_eq!(found.project_number, 222);
        assert_eq!(found.workload_identity_pool_provider_id, "prov-y");
    }

    #[test]
    fn test_absent_provider_not_found() {
        let err = find_gcp_provider(listing(), "w").unwrap_err();
        assert!(matches!(err, TlspcError::NotFound(_)));
        assert_eq!(err.to_string(), "GCP CloudProvider not found");
    }

    #[test]
    fn test_other_variant_rejected() {
        let err = find_gcp_provider(listing(), "z").unwrap_err();
        assert!(matches!(err, TlspcError::UnexpectedVariant(_)));
    }

    #[test]
    fn test_details_union() {
        let details: CloudProviderDetails = serde_json::from_value(serde_json::json!({
            "__typename": "GCPProviderDetails",
            "cloudProvider": {"id": "x", "status": "VALIDATED"}
        }))
        .unwrap();
        assert_eq!(
            details,
            CloudProviderDetails::Gcp {
                cloud_provider: StatusRef {
                    id: "x".into(),
                    status: CloudProviderStatus::Validated
                }
            }
        );

        let other: CloudProviderDetails =
            serde_json::from_value(serde_json::json!({"__typename": "AWSProviderDetails"}))
                .unwrap();
        assert_eq!(other, CloudProviderDetails::Other);
    }

    #[test]
    fn test_unknown_status() {
        let status: CloudProviderStatus = serde_json::from_str(r#""PENDING""#).unwrap();
        assert_eq!(status, CloudProviderStatus::Unknown);
    }

    #[test]
    fn test_variables_require_uuid_team() {
        let provider = GcpProvider {
            team: "not-a-uuid".into(),
            ..Default::default()
        };
        assert!(matches!(
            ProviderVariables::new(None, &provider),
            Err(TlspcError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_variables_project_number_as_string() {
        let provider = GcpProvider {
            name: "gcp".into(),
            team: "6f1e2d3c-4b5a-4978-8c6d-5e4f3a2b1c0d".into(),
            project_number: 123456789012,
            ..Default::default()
        };
        let json = serde_json::to_value(ProviderVariables::new(None, &provider).unwrap()).unwrap();
        assert_eq!(json["projectNumber"], "123456789012");
        assert!(json.get("id").is_none());
    }
}
