//! API Module
//!
//! HTTP communication with the EMS backend. [`ApiClient`] is the shared
//! request wrapper; each submodule maps one REST resource family onto typed
//! functions.

pub mod analytics;
pub mod auth;
pub mod equipment;
pub mod inspection;
pub mod knowledge;
pub mod maintenance;
pub mod repair;
pub mod sparepart;
pub mod user;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS};

/// API client for the EMS backend
///
/// Cloning is cheap; clones share the bearer token slot.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client from resolved configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_base_url.as_str(), config.timeout)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token attached to subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    pub fn users(&self) -> user::UserApi<'_> {
        user::UserApi::new(self)
    }

    pub fn organization(&self) -> equipment::OrganizationApi<'_> {
        equipment::OrganizationApi::new(self)
    }

    pub fn equipment_types(&self) -> equipment::EquipmentTypeApi<'_> {
        equipment::EquipmentTypeApi::new(self)
    }

    pub fn equipment(&self) -> equipment::EquipmentApi<'_> {
        equipment::EquipmentApi::new(self)
    }

    pub fn inspection(&self) -> inspection::InspectionApi<'_> {
        inspection::InspectionApi::new(self)
    }

    pub fn maintenance(&self) -> maintenance::MaintenanceApi<'_> {
        maintenance::MaintenanceApi::new(self)
    }

    pub fn repair(&self) -> repair::RepairApi<'_> {
        repair::RepairApi::new(self)
    }

    pub fn spareparts(&self) -> sparepart::SparePartApi<'_> {
        sparepart::SparePartApi::new(self)
    }

    pub fn knowledge(&self) -> knowledge::KnowledgeApi<'_> {
        knowledge::KnowledgeApi::new(self)
    }

    pub fn analytics(&self) -> analytics::AnalyticsApi<'_> {
        analytics::AnalyticsApi::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path)).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);

        debug!("{} {}", method, url);

        let builder = self.client.request(method, &url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("Status: {}", status));

            if status == StatusCode::UNAUTHORIZED {
                warn!("Request rejected as unauthorized: {}", message);
                return Err(ApiError::Unauthorized(message));
            }

            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        decode(&body)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token().is_some())
            .finish()
    }
}

// Some endpoints answer with an empty body
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Percent-encode a value interpolated into a path segment
pub(crate) fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Acknowledgement returned by endpoints without a typed payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Paged list envelope, `{ total, items }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub total: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// HTTP status when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ApiClient;
    use httpmock::MockServer;

    pub(crate) const API_PREFIX: &str = "/api/v1";

    pub(crate) fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&format!("{}{}", server.base_url(), API_PREFIX)).expect("client")
    }

    pub(crate) fn authed_client_for(server: &MockServer, token: &str) -> ApiClient {
        let client = client_for(server);
        client.set_token(Some(token.to_string()));
        client
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn attaches_bearer_token_when_present() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/equipment/statistics")
                    .header("authorization", "Bearer tok-1");
                then.status(200).json_body(json!({
                    "total": 4, "running": 1, "stopped": 1, "maintenance": 1, "scrapped": 1
                }));
            })
            .await;

        let client = authed_client_for(&server, "tok-1");
        let stats: serde_json::Value = client.get("/equipment/statistics").await.expect("stats");

        mock.assert_async().await;
        assert_eq!(stats["total"], 4);
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/analytics/dashboard").header_missing("authorization");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = client_for(&server);
        let _: serde_json::Value = client.get("/analytics/dashboard").await.expect("ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn translates_unauthorized_and_server_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/auth/me");
                then.status(401).json_body(json!({ "error": "User not authenticated" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/equipment/9");
                then.status(404).json_body(json!({ "error": "Equipment not found" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/equipment/10");
                then.status(500).body("boom");
            })
            .await;

        let client = client_for(&server);

        let err = client.get::<serde_json::Value>("/auth/me").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        match client.get::<serde_json::Value>("/equipment/9").await.unwrap_err() {
            ApiError::Server { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Equipment not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match client.get::<serde_json::Value>("/equipment/10").await.unwrap_err() {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/spareparts/statistics");
                then.status(200).body("[1, 2");
            })
            .await;

        let client = client_for(&server);
        let err = client
            .get::<MessageResponse>("/spareparts/statistics")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_body_decodes_as_acknowledgement() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/logout");
                then.status(200);
            })
            .await;

        let client = client_for(&server);
        let ack: MessageResponse = client.post_empty("/auth/logout").await.expect("ack");
        assert_eq!(ack, MessageResponse::default());
    }

    #[test]
    fn clones_share_token_slot() {
        let client = ApiClient::new("http://localhost:8080/api/v1/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");

        let clone = client.clone();
        client.set_token(Some("abc".into()));
        assert_eq!(clone.token().as_deref(), Some("abc"));

        clone.set_token(Some(String::new()));
        assert_eq!(client.token(), None);
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(segment("EQ-001"), "EQ-001");
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }
}
