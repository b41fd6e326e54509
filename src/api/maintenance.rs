//! Maintenance planning endpoints: plans, items, task generation and execution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ListResponse, MessageResponse};

/// Maintenance depth, sent as 1/2/3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceLevel {
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
}

impl MaintenanceLevel {
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            3 => Some(Self::Level3),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Level1 => "一级保养",
            Self::Level2 => "二级保养",
            Self::Level3 => "精度保养",
        }
    }
}

/// Display name for a raw level number
pub fn level_name(level: i32) -> &'static str {
    MaintenanceLevel::from_level(level)
        .map(|l| l.label())
        .unwrap_or("未知")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceTaskStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl MaintenanceTaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "待执行",
            Self::InProgress => "进行中",
            Self::Completed => "已完成",
            Self::Overdue => "已逾期",
        }
    }

    /// Colour tag for status badges
    pub fn tag_type(&self) -> &'static str {
        match self {
            Self::Pending => "info",
            Self::InProgress => "warning",
            Self::Completed => "success",
            Self::Overdue => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePlan {
    pub id: i64,
    pub name: String,
    pub equipment_type_id: i64,
    #[serde(default)]
    pub equipment_type_name: Option<String>,
    pub level: i32,
    #[serde(default)]
    pub level_name: Option<String>,
    pub cycle_days: i32,
    #[serde(default)]
    pub flexible_days: i32,
    #[serde(default)]
    pub work_hours: f64,
    #[serde(default)]
    pub item_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMaintenancePlanRequest {
    pub name: String,
    pub equipment_type_id: i64,
    pub level: i32,
    pub cycle_days: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flexible_days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceItem {
    pub id: i64,
    pub plan_id: i64,
    pub name: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub criteria: Option<String>,
    pub sequence_order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMaintenanceItemRequest {
    pub plan_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    pub sequence_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: i64,
    pub plan_id: i64,
    #[serde(default)]
    pub plan_name: Option<String>,
    pub equipment_id: i64,
    #[serde(default)]
    pub equipment_code: Option<String>,
    #[serde(default)]
    pub equipment_name: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    pub scheduled_date: String,
    pub due_date: String,
    pub status: MaintenanceTaskStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default)]
    pub completed_count: i64,
    pub created_at: String,
}

pub type MaintenanceTaskListResponse = ListResponse<MaintenanceTask>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MaintenanceTaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MaintenanceTaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Generate one task per equipment for a plan on a given date
#[derive(Debug, Clone, Serialize)]
pub struct GenerateMaintenanceTasksRequest {
    pub plan_id: i64,
    pub equipment_ids: Vec<i64>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateMaintenanceTasksResponse {
    pub created_count: i64,
    #[serde(default)]
    pub task_ids: Vec<i64>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartMaintenanceRequest {
    pub task_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceItemRecord {
    pub item_id: i64,
    /// OK / NG
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompleteMaintenanceRequest {
    pub task_id: i64,
    pub records: Vec<MaintenanceItemRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompleteMaintenanceResponse {
    pub task_id: i64,
    pub completed_at: String,
    pub total_count: i64,
    pub ok_count: i64,
    pub ng_count: i64,
    #[serde(default)]
    pub ng_item_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatistics {
    pub total_plans: i64,
    pub total_tasks: i64,
    pub pending_tasks: i64,
    pub in_progress_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub today_completed: i64,
    pub completion_rate: f64,
}

pub struct MaintenanceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MaintenanceApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_plans(&self) -> Result<Vec<MaintenancePlan>, ApiError> {
        self.client.get("/maintenance/plans").await
    }

    pub async fn create_plan(
        &self,
        data: &CreateMaintenancePlanRequest,
    ) -> Result<MaintenancePlan, ApiError> {
        self.client.post("/maintenance/plans", data).await
    }

    pub async fn create_item(
        &self,
        data: &CreateMaintenanceItemRequest,
    ) -> Result<MaintenanceItem, ApiError> {
        self.client.post("/maintenance/items", data).await
    }

    pub async fn generate_tasks(
        &self,
        data: &GenerateMaintenanceTasksRequest,
    ) -> Result<GenerateMaintenanceTasksResponse, ApiError> {
        self.client.post("/maintenance/tasks/generate", data).await
    }

    pub async fn get_tasks(
        &self,
        query: &MaintenanceTaskQuery,
    ) -> Result<MaintenanceTaskListResponse, ApiError> {
        self.client.get_with("/maintenance/tasks", query).await
    }

    pub async fn get_task(&self, id: i64) -> Result<MaintenanceTask, ApiError> {
        self.client.get(&format!("/maintenance/tasks/{}", id)).await
    }

    pub async fn get_my_tasks(&self) -> Result<Vec<MaintenanceTask>, ApiError> {
        self.client.get("/maintenance/my-tasks").await
    }

    pub async fn start(&self, data: &StartMaintenanceRequest) -> Result<MessageResponse, ApiError> {
        self.client.post("/maintenance/start", data).await
    }

    pub async fn complete(
        &self,
        data: &CompleteMaintenanceRequest,
    ) -> Result<CompleteMaintenanceResponse, ApiError> {
        self.client.post("/maintenance/complete", data).await
    }

    pub async fn get_statistics(&self) -> Result<MaintenanceStatistics, ApiError> {
        self.client.get("/maintenance/statistics").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn level_and_status_labels() {
        assert_eq!(level_name(1), "一级保养");
        assert_eq!(level_name(3), "精度保养");
        assert_eq!(level_name(9), "未知");

        assert_eq!(MaintenanceTaskStatus::Pending.label(), "待执行");
        assert_eq!(MaintenanceTaskStatus::Overdue.label(), "已逾期");
        assert_eq!(MaintenanceTaskStatus::InProgress.tag_type(), "warning");
        assert_eq!(MaintenanceTaskStatus::Completed.tag_type(), "success");
    }

    #[tokio::test]
    async fn generate_posts_plan_equipment_and_date() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/maintenance/tasks/generate").json_body(json!({
                    "plan_id": 2, "equipment_ids": [10, 11], "date": "2024-06-01"
                }));
                then.status(200).json_body(json!({
                    "created_count": 1, "task_ids": [100],
                    "errors": ["equipment 11 already has a task"]
                }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let result = client
            .maintenance()
            .generate_tasks(&GenerateMaintenanceTasksRequest {
                plan_id: 2,
                equipment_ids: vec![10, 11],
                date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            })
            .await
            .expect("generate");

        mock.assert_async().await;
        assert_eq!(result.created_count, 1);
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn start_returns_acknowledgement() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/maintenance/start")
                    .json_body(json!({ "task_id": 5 }));
                then.status(200).json_body(json!({ "message": "Maintenance started" }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let ack = client
            .maintenance()
            .start(&StartMaintenanceRequest {
                task_id: 5,
                latitude: None,
                longitude: None,
            })
            .await
            .expect("start");
        mock.assert_async().await;
        assert_eq!(ack.message, "Maintenance started");
    }

    #[tokio::test]
    async fn task_list_decodes_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/maintenance/tasks")
                    .query_param("status", "overdue")
                    .query_param("page", "1");
                then.status(200).json_body(json!({
                    "total": 1,
                    "items": [{
                        "id": 1, "plan_id": 2, "equipment_id": 3,
                        "scheduled_date": "2024-06-01", "due_date": "2024-06-04",
                        "status": "overdue", "actual_hours": 0, "item_count": 4,
                        "completed_count": 0, "created_at": "2024-05-30T00:00:00Z"
                    }]
                }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let page = client
            .maintenance()
            .get_tasks(&MaintenanceTaskQuery {
                status: Some(MaintenanceTaskStatus::Overdue),
                page: Some(1),
                ..Default::default()
            })
            .await
            .expect("tasks");
        assert_eq!(page.items[0].status.tag_type(), "danger");
    }
}
