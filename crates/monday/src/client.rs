//! HTTP client for the monday.com GraphQL API

use crate::error::{MondayError, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.monday.com/v2";

/// User-facing message for a rejected credential, surfaced verbatim in the UI
pub const MSG_INVALID_TOKEN: &str = "APIトークンが無効です。再入力してください。";

/// User-facing message for rate limiting, surfaced verbatim in the UI
pub const MSG_RATE_LIMIT: &str = "APIレート制限に達しました。しばらく待ってから再試行してください。";

/// Client for the monday.com GraphQL API
///
/// The whole API is a single POST endpoint taking `{query, variables}`;
/// this client owns the transport and maps HTTP/GraphQL failures onto
/// [`MondayError`]. Query strings live with their callers.
///
/// # Error mapping
///
/// - HTTP 401 → [`MondayError::Auth`] (credential needs re-entry)
/// - HTTP 429 → [`MondayError::RateLimit`] (caller should back off)
/// - other non-2xx → [`MondayError::Transport`]
/// - 2xx carrying an `errors` list → [`MondayError::Query`] with the first
///   reported message
/// - network/decode failures → [`MondayError::Http`]
#[derive(Clone)]
pub struct MondayClient {
    http_client: HttpClient,
    api_token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl MondayClient {
    /// Creates a new client against the production endpoint
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, DEFAULT_BASE_URL)
    }

    /// Creates a new client against a custom endpoint (proxy, tests)
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| MondayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_token: api_token.into(),
            base_url: base_url.into(),
        })
    }

    /// Executes a GraphQL query and deserializes the `data` payload
    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        tracing::debug!("POST {}", self.base_url);

        let response = self
            .http_client
            .post(&self.base_url)
            .header("Authorization", &self.api_token)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            401 => return Err(MondayError::Auth(MSG_INVALID_TOKEN.to_string())),
            429 => return Err(MondayError::RateLimit(MSG_RATE_LIMIT.to_string())),
            _ => {}
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("monday API error ({}): {}", status.as_u16(), body);

            return Err(MondayError::Transport {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: GraphQlEnvelope<T> = response.json().await?;

        if let Some(first) = envelope.errors.into_iter().next() {
            return Err(MondayError::Query(first.message));
        }

        envelope.data.ok_or_else(|| MondayError::Transport {
            status: status.as_u16(),
            message: "response contained no data".to_string(),
        })
    }

    /// Returns the configured authentication token
    pub fn token(&self) -> &str {
        &self.api_token
    }

    /// Returns the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[derive(Debug, Deserialize)]
    struct MeData {
        me: Me,
    }

    #[derive(Debug, Deserialize)]
    struct Me {
        id: String,
    }

    #[test]
    fn test_client_creation() {
        let client = MondayClient::new("test-token").unwrap();
        assert_eq!(client.token(), "test-token");
        assert_eq!(client.base_url(), "https://api.monday.com/v2");
    }

    #[tokio::test]
    async fn test_query_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/").body_contains("me");
                then.status(200)
                    .json_body(serde_json::json!({ "data": { "me": { "id": "u1" } } }));
            })
            .await;

        let client = MondayClient::with_base_url("t", server.url("/")).unwrap();
        let data: MeData = client.query("query { me { id } }", json!({})).await.unwrap();

        mock.assert_async().await;
        assert_eq!(data.me.id, "u1");
    }

    #[tokio::test]
    async fn test_401_maps_to_auth_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(401);
            })
            .await;

        let client = MondayClient::with_base_url("bad", server.url("/")).unwrap();
        let err = client
            .query::<serde_json::Value>("query { me { id } }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, MondayError::Auth(_)));
        assert_eq!(err.to_string(), MSG_INVALID_TOKEN);
    }

    #[tokio::test]
    async fn test_429_maps_to_rate_limit_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(429);
            })
            .await;

        let client = MondayClient::with_base_url("t", server.url("/")).unwrap();
        let err = client
            .query::<serde_json::Value>("query { me { id } }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, MondayError::RateLimit(_)));
    }

    #[tokio::test]
    async fn test_graphql_errors_map_to_query_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(serde_json::json!({
                    "errors": [
                        { "message": "Field 'bords' doesn't exist" },
                        { "message": "second error is ignored" }
                    ]
                }));
            })
            .await;

        let client = MondayClient::with_base_url("t", server.url("/")).unwrap();
        let err = client
            .query::<serde_json::Value>("query { bords }", json!({}))
            .await
            .unwrap_err();

        match err {
            MondayError::Query(message) => {
                assert_eq!(message, "Field 'bords' doesn't exist");
            }
            other => panic!("expected Query error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_status_maps_to_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(502).body("bad gateway");
            })
            .await;

        let client = MondayClient::with_base_url("t", server.url("/")).unwrap();
        let err = client
            .query::<serde_json::Value>("query { me { id } }", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, MondayError::Transport { status: 502, .. }));
    }
}
