//! Authentication endpoints (`/auth/*`).

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MessageResponse};
use crate::role::Role;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(default)]
    pub approval_status: String,
    #[serde(default)]
    pub must_change_password: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Unix seconds
    pub expire_at: i64,
    pub user_info: UserInfo,
    #[serde(default)]
    pub must_change_password: bool,
}

impl LoginResponse {
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.expire_at, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
    pub expire_at: i64,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Self-service account application, pending admin approval
#[derive(Debug, Clone, Serialize)]
pub struct ApplyAccountRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, data: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.post("/auth/login", data).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.client.post_empty("/auth/logout").await
    }

    pub async fn get_user_info(&self) -> Result<UserInfo, ApiError> {
        self.client.get("/auth/me").await
    }

    pub async fn refresh_token(&self, token: &str) -> Result<RefreshResponse, ApiError> {
        self.client.post("/auth/refresh", &RefreshRequest { token }).await
    }

    pub async fn change_password(
        &self,
        data: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post("/auth/change-password", data).await
    }

    pub async fn apply_account(
        &self,
        data: &ApplyAccountRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post("/auth/apply", data).await
    }
}
