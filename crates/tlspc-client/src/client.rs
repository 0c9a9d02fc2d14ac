//! HTTP transport shared by every API family
//!
//! Each request carries the API key header and a version-stamped user agent.
//! Response bodies are read in full before interpretation so that error
//! messages can always quote what the server sent back.

use crate::error::{Result, TlspcError};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_ENDPOINT: &str = "https://api.venafi.cloud";

pub(crate) const API_KEY_HEADER: &str = "tppl-api-key";

/// Authenticated TLSPC API client
///
/// Holds no mutable state; clone it or share it behind an `Arc`.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    version: String,
}

/// Status and fully-read body of a response.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// DTOs whose presence of an identifier signals a successful write.
pub(crate) trait Identified {
    fn id(&self) -> &str;
}

impl Client {
    /// Create a client. An absent or empty endpoint falls back to
    /// [`DEFAULT_ENDPOINT`].
    pub fn new(
        api_key: impl Into<String>,
        endpoint: Option<&str>,
        version: impl Into<String>,
    ) -> Self {
        let endpoint = match endpoint {
            Some(e) if !e.trim().is_empty() => e.trim_end_matches('/').to_string(),
            _ => DEFAULT_ENDPOINT.to_string(),
        };

        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint,
            version: version.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn user_agent(&self) -> String {
        format!("terraform-provider-tlspc/{}", self.version)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        self.execute(self.http.get(&url), None).await
    }

    pub(crate) async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        self.execute(self.http.post(&url), Some(encode(body)?)).await
    }

    pub(crate) async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);
        self.execute(self.http.put(&url), Some(encode(body)?)).await
    }

    pub(crate) async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("PATCH {}", url);
        self.execute(self.http.patch(&url), Some(encode(body)?)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);
        self.execute(self.http.delete(&url), None).await
    }

    /// DELETE with a JSON body, used by the team owner removal endpoint.
    pub(crate) async fn delete_with_body<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("DELETE {} (with body)", url);
        self.execute(self.http.delete(&url), Some(encode(body)?))
            .await
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let mut request = request
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .header(USER_AGENT, self.user_agent());
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("-> {} ({} bytes)", status, body.len());

        Ok(RawResponse { status, body })
    }
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(TlspcError::Encode)
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T> {
    serde_json::from_str(&raw.body).map_err(|source| TlspcError::Decode {
        source,
        body: raw.body.clone(),
    })
}

/// Decode a single entity and insist on a non-empty identifier.
///
/// The status code is not consulted: an empty identifier is the failure
/// signal, and the raw body is carried into the error either way.
pub(crate) fn decode_identified<T: DeserializeOwned + Identified>(
    raw: &RawResponse,
    action: &'static str,
) -> Result<T> {
    let value: T = decode(raw)?;
    require_id(value, raw, action)
}

pub(crate) fn require_id<T: Identified>(
    value: T,
    raw: &RawResponse,
    action: &'static str,
) -> Result<T> {
    if value.id().is_empty() {
        return Err(TlspcError::MissingId {
            action,
            body: raw.body.clone(),
        });
    }
    Ok(value)
}

/// Unwrap a collection envelope that must hold exactly one element.
pub(crate) fn single<T>(items: Vec<T>, what: &'static str) -> Result<T> {
    let count = items.len();
    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (Some(item), None) => Ok(item),
        _ => Err(TlspcError::UnexpectedCount { what, count }),
    }
}

pub(crate) fn expect_status(
    raw: &RawResponse,
    accepted: &[u16],
    action: &'static str,
) -> Result<()> {
    if accepted.contains(&raw.status) {
        Ok(())
    } else {
        Err(TlspcError::UnexpectedStatus {
            action,
            status: raw.status,
            body: raw.body.clone(),
        })
    }
}

pub(crate) fn require_non_empty(id: &str) -> Result<()> {
    if id.is_empty() {
        Err(TlspcError::EmptyId)
    } else {
        Ok(())
    }
}
