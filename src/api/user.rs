//! User administration endpoints (`/users`).

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, MessageResponse};
use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    pub is_active: bool,
    #[serde(default)]
    pub approval_status: String,
    #[serde(default)]
    pub must_change_password: bool,
    #[serde(default)]
    pub factory_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveUserRequest {
    pub approve: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateUserResponse {
    pub id: i64,
    #[serde(default)]
    pub message: String,
}

pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.client.get("/users").await
    }

    pub async fn create_user(&self, data: &CreateUserRequest) -> Result<CreateUserResponse, ApiError> {
        self.client.post("/users", data).await
    }

    pub async fn update_user(
        &self,
        id: i64,
        data: &UpdateUserRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/users/{}", id), data).await
    }

    /// Account applications awaiting review
    pub async fn get_pending_applications(&self) -> Result<Vec<User>, ApiError> {
        self.client.get("/users/applications").await
    }

    pub async fn approve_application(
        &self,
        id: i64,
        data: &ApproveUserRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/users/{}/approve", id), data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn approve_puts_decision_to_user_path() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/v1/users/12/approve")
                    .json_body(json!({ "approve": false, "reason": "duplicate" }));
                then.status(200).json_body(json!({ "message": "Application rejected" }));
            })
            .await;

        let client = authed_client_for(&server, "admin-token");
        let ack = client
            .users()
            .approve_application(
                12,
                &ApproveUserRequest {
                    approve: false,
                    reason: Some("duplicate".into()),
                },
            )
            .await
            .expect("approve");

        mock.assert_async().await;
        assert_eq!(ack.message, "Application rejected");
    }

    #[tokio::test]
    async fn partial_update_sends_only_set_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/v1/users/3")
                    .json_body(json!({ "role": "supervisor", "is_active": true }));
                then.status(200).json_body(json!({ "message": "ok" }));
            })
            .await;

        let client = authed_client_for(&server, "admin-token");
        client
            .users()
            .update_user(
                3,
                &UpdateUserRequest {
                    role: Some(Role::Supervisor),
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn lists_pending_applications() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/users/applications");
                then.status(200).json_body(json!([{
                    "id": 5, "username": "carol", "name": "Carol", "role": "maintenance",
                    "phone": "", "is_active": false, "approval_status": "pending",
                    "must_change_password": false, "created_at": "2024-05-01 08:00:00"
                }]));
            })
            .await;

        let client = authed_client_for(&server, "admin-token");
        let pending = client.users().get_pending_applications().await.expect("list");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].role, Role::Maintenance);
        assert_eq!(pending[0].factory_id, None);
    }
}
