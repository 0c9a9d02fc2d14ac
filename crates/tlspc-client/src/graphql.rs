//! Minimal GraphQL transport
//!
//! Queries are plain strings posted to `/graphql` with the same headers as
//! REST calls. Responses are decoded into caller-supplied `data` types.

use crate::client::{Client, RawResponse, decode};
use crate::error::{Result, TlspcError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

impl Client {
    pub(crate) async fn graphql<V, T>(&self, operation: &str, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        tracing::debug!("GraphQL operation {}", operation);
        let request = GraphQlRequest {
            operation_name: operation,
            query,
            variables,
        };
        let raw = self.post("/graphql", &request).await?;
        interpret(&raw)
    }
}

/// Turn a GraphQL envelope into its `data`, failing on any reported error.
pub(crate) fn interpret<T: DeserializeOwned>(raw: &RawResponse) -> Result<T> {
    let response: GraphQlResponse<T> = decode(raw)?;
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(TlspcError::GraphQl(messages.join("; ")));
    }
    response
        .data
        .ok_or_else(|| TlspcError::GraphQl(format!("no data in response: {}", raw.body)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V> {
    operation_name: &'a str,
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}
