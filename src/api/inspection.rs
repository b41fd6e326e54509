//! Inspection round endpoints: templates, items, tasks and execution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ListResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionTemplate {
    pub id: i64,
    pub name: String,
    pub equipment_type_id: i64,
    #[serde(default)]
    pub equipment_type_name: Option<String>,
    #[serde(default)]
    pub item_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionTemplateDetail {
    #[serde(flatten)]
    pub template: InspectionTemplate,
    #[serde(default)]
    pub items: Vec<InspectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionItem {
    pub id: i64,
    pub template_id: i64,
    #[serde(default)]
    pub template_name: Option<String>,
    pub name: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub criteria: Option<String>,
    pub sequence_order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionTaskStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

/// Outcome recorded for a single check item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckResult {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NG")]
    Ng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionTask {
    pub id: i64,
    pub equipment_id: i64,
    #[serde(default)]
    pub equipment_code: Option<String>,
    #[serde(default)]
    pub equipment_name: Option<String>,
    pub template_id: i64,
    #[serde(default)]
    pub template_name: Option<String>,
    pub assigned_to: i64,
    #[serde(default)]
    pub assignee_name: Option<String>,
    pub scheduled_date: String,
    pub status: InspectionTaskStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default)]
    pub completed_count: i64,
}

pub type InspectionTaskListResponse = ListResponse<InspectionTask>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: i64,
    pub task_id: i64,
    pub item_id: i64,
    #[serde(default)]
    pub item_name: Option<String>,
    pub result: CheckResult,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub created_at: String,
}

/// Equipment summary embedded in inspection responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionEquipment {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub type_id: i64,
    #[serde(default)]
    pub type_name: Option<String>,
    pub workshop_id: i64,
    #[serde(default)]
    pub workshop_name: Option<String>,
    #[serde(default)]
    pub factory_id: Option<i64>,
    #[serde(default)]
    pub factory_name: Option<String>,
    pub qr_code: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub equipment_type_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateItemRequest {
    pub template_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    pub sequence_order: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectionTaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InspectionTaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

/// Start an inspection after scanning the equipment QR code
#[derive(Debug, Clone, Serialize)]
pub struct StartInspectionRequest {
    pub equipment_id: i64,
    pub qr_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Unix seconds at scan time
    pub timestamp: i64,
}

impl StartInspectionRequest {
    /// Request stamped with the current time
    pub fn scanned_now(equipment_id: i64, qr_code: impl Into<String>) -> Self {
        Self {
            equipment_id,
            qr_code: qr_code.into(),
            latitude: None,
            longitude: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartInspectionResponse {
    pub task_id: i64,
    pub equipment_id: i64,
    #[serde(default)]
    pub equipment: Option<InspectionEquipment>,
    #[serde(default)]
    pub items: Option<Vec<InspectionItem>>,
    pub started_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectionRecordInput {
    pub item_id: i64,
    pub result: CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompleteInspectionRequest {
    pub task_id: i64,
    pub records: Vec<InspectionRecordInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompleteInspectionResponse {
    pub task_id: i64,
    pub completed_at: String,
    pub total_count: i64,
    pub ok_count: i64,
    pub ng_count: i64,
    #[serde(default)]
    pub ng_items: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionStatistics {
    pub total_tasks: i64,
    pub pending_tasks: i64,
    pub in_progress_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub today_completed: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTasksStatistics {
    pub pending_count: i64,
    pub in_progress_count: i64,
    pub today_tasks: i64,
}

pub struct InspectionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InspectionApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_templates(&self) -> Result<Vec<InspectionTemplate>, ApiError> {
        self.client.get("/inspection/templates").await
    }

    pub async fn get_template(&self, id: i64) -> Result<InspectionTemplateDetail, ApiError> {
        self.client.get(&format!("/inspection/templates/{}", id)).await
    }

    pub async fn create_template(
        &self,
        data: &CreateTemplateRequest,
    ) -> Result<InspectionTemplate, ApiError> {
        self.client.post("/inspection/templates", data).await
    }

    pub async fn create_item(&self, data: &CreateItemRequest) -> Result<InspectionItem, ApiError> {
        self.client.post("/inspection/items", data).await
    }

    pub async fn get_tasks(
        &self,
        query: &InspectionTaskQuery,
    ) -> Result<InspectionTaskListResponse, ApiError> {
        self.client.get_with("/inspection/tasks", query).await
    }

    pub async fn get_task(&self, id: i64) -> Result<InspectionTask, ApiError> {
        self.client.get(&format!("/inspection/tasks/{}", id)).await
    }

    pub async fn get_my_tasks(&self) -> Result<Vec<InspectionTask>, ApiError> {
        self.client.get("/inspection/my-tasks").await
    }

    pub async fn get_my_stats(&self) -> Result<MyTasksStatistics, ApiError> {
        self.client.get("/inspection/my-stats").await
    }

    pub async fn start(
        &self,
        data: &StartInspectionRequest,
    ) -> Result<StartInspectionResponse, ApiError> {
        self.client.post("/inspection/start", data).await
    }

    pub async fn complete(
        &self,
        data: &CompleteInspectionRequest,
    ) -> Result<CompleteInspectionResponse, ApiError> {
        self.client.post("/inspection/complete", data).await
    }

    pub async fn get_statistics(&self) -> Result<InspectionStatistics, ApiError> {
        self.client.get("/inspection/statistics").await
    }
}
