//! Client tests against a one-shot local HTTP responder

use tlspc_client::{Client, ServiceAccount, Team, TlspcError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve exactly one request with the given status and body, and hand back
/// the raw request text.
async fn respond_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });

    (format!("http://{}", addr), rx)
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..split]
        .lines()
        .find_map(|l| {
            let lower = l.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
        })
        .unwrap_or(0);
    buf.len() >= split + 4 + length
}

#[tokio::test]
async fn test_headers_and_path() {
    let (endpoint, request) =
        respond_once(200, r#"{"id":"t-1","name":"pki","role":"GUEST","owners":[]}"#).await;
    let client = Client::new("secret-key", Some(&endpoint), "1.2.3");

    let team = client.get_team("t-1").await.unwrap();
    assert_eq!(team.id, "t-1");

    let request = request.await.unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with("GET /v1/teams/t-1 HTTP/1.1"));
    assert!(lower.contains("tppl-api-key: secret-key"));
    assert!(lower.contains("user-agent: terraform-provider-tlspc/1.2.3"));
    assert!(lower.contains("content-type: application/json"));
}

#[tokio::test]
async fn test_create_without_id_reports_body() {
    let body = r#"{"errors":[{"code":10051,"message":"team name already exists"}]}"#;
    let (endpoint, _request) = respond_once(200, body).await;
    let client = Client::new("k", Some(&endpoint), "1.0.0");

    let team = Team {
        name: "dup".into(),
        role: "GUEST".into(),
        ..Default::default()
    };
    let err = client.create_team(&team).await.unwrap_err();
    assert!(matches!(err, TlspcError::MissingId { .. }));
    assert!(err.to_string().contains("team name already exists"));
}

#[tokio::test]
async fn test_team_delete_accepts_200() {
    let (endpoint, request) = respond_once(200, "").await;
    let client = Client::new("k", Some(&endpoint), "1.0.0");
    client.delete_team("t-1").await.unwrap();
    assert!(request.await.unwrap().starts_with("DELETE /v1/teams/t-1 "));
}

#[tokio::test]
async fn test_team_delete_rejects_404() {
    let (endpoint, _request) = respond_once(404, r#"{"message":"gone"}"#).await;
    let client = Client::new("k", Some(&endpoint), "1.0.0");
    let err = client.delete_team("t-1").await.unwrap_err();
    assert!(matches!(err, TlspcError::UnexpectedStatus { status: 404, .. }));
    assert!(err.to_string().contains("gone"));
}

#[tokio::test]
async fn test_remove_owners_sends_body_with_delete() {
    let (endpoint, request) = respond_once(200, r#"{"id":"t-1","name":"n","role":"GUEST"}"#).await;
    let client = Client::new("k", Some(&endpoint), "1.0.0");
    client
        .remove_team_owners("t-1", &["a".to_string()])
        .await
        .unwrap();

    let request = request.await.unwrap();
    assert!(request.starts_with("DELETE /v1/teams/t-1/owners "));
    assert!(request.ends_with(r#"{"owners":["a"]}"#));
}

#[tokio::test]
async fn test_service_account_update_requires_204() {
    let (endpoint, request) = respond_once(200, r#"{"unexpected":true}"#).await;
    let client = Client::new("k", Some(&endpoint), "1.0.0");
    let sa = ServiceAccount {
        id: "sa-1".into(),
        name: "agent".into(),
        ..Default::default()
    };
    let err = client.update_service_account(&sa).await.unwrap_err();
    assert!(matches!(err, TlspcError::UnexpectedStatus { status: 200, .. }));

    let request = request.await.unwrap();
    assert!(request.starts_with("PATCH /v1/serviceaccounts/sa-1 "));
    assert!(!request.contains(r#""id":"sa-1""#));
}

#[tokio::test]
async fn test_update_with_empty_id_makes_no_request() {
    let client = Client::new("k", Some("http://127.0.0.1:9"), "1.0.0");
    let err = client
        .update_service_account(&ServiceAccount::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TlspcError::EmptyId));
}

#[tokio::test]
async fn test_graphql_listing_scans_for_id() {
    let body = r#"{"data":{"cloudProviders":{"nodes":[
        {"id":"a","name":"one","team":{"id":"t"},"configuration":{"__typename":"CloudProviderGCPConfiguration","issuerUrl":"https://i","serviceAccountEmail":"e","projectNumber":"42","workloadIdentityPoolId":"p","workloadIdentityPoolProviderId":"q"}}
    ]}}}"#;
    let (endpoint, request) = respond_once(200, body).await;
    let client = Client::new("k", Some(&endpoint), "1.0.0");

    let provider = client.get_gcp_provider("a").await.unwrap();
    assert_eq!(provider.project_number, 42);
    assert_eq!(provider.issuer_url, "https://i");

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /graphql "));
    assert!(request.contains("GCPProviders"));
}
