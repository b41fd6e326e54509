//! Repair ticketing endpoints (`/repair/*`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ListResponse, MessageResponse};

/// Lifecycle of a repair order, in workflow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    Pending,
    Assigned,
    InProgress,
    Testing,
    Confirmed,
    Audited,
    Closed,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Testing => "testing",
            Self::Confirmed => "confirmed",
            Self::Audited => "audited",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "待派单",
            Self::Assigned => "已派单",
            Self::InProgress => "维修中",
            Self::Testing => "待测试",
            Self::Confirmed => "待审核",
            Self::Audited => "已审核",
            Self::Closed => "已关闭",
        }
    }

    pub fn tag_type(&self) -> &'static str {
        match self {
            Self::Pending => "info",
            Self::Assigned => "primary",
            Self::InProgress | Self::Testing => "warning",
            Self::Confirmed | Self::Audited => "success",
            Self::Closed => "info",
        }
    }
}

/// Priority label; 1 high, 2 medium, 3 low. Unknown values read as medium.
pub fn priority_text(priority: i32) -> &'static str {
    match priority {
        1 => "高",
        3 => "低",
        _ => "中",
    }
}

pub fn priority_type(priority: i32) -> &'static str {
    match priority {
        1 => "danger",
        2 => "warning",
        _ => "info",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOrder {
    pub id: i64,
    pub equipment_id: i64,
    #[serde(default)]
    pub equipment_code: Option<String>,
    #[serde(default)]
    pub equipment_name: Option<String>,
    pub fault_description: String,
    #[serde(default)]
    pub fault_code: Option<String>,
    pub reporter_id: i64,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    pub status: RepairStatus,
    pub priority: i32,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub spare_parts: Option<String>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    pub created_at: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<String>,
    #[serde(default)]
    pub audited_at: Option<String>,
}

pub type RepairOrderListResponse = ListResponse<RepairOrder>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairLog {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    pub action: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOrderDetail {
    #[serde(flatten)]
    pub order: RepairOrder,
    #[serde(default)]
    pub logs: Option<Vec<RepairLog>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RepairOrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RepairStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepairRequest {
    pub equipment_id: i64,
    pub fault_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignRepairRequest {
    pub assign_to: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StartRepairRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRepairRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spare_parts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    /// `testing` or `confirmed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_status: Option<RepairStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmRepairRequest {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditRepairRequest {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairStatistics {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub in_progress_orders: i64,
    pub completed_orders: i64,
    pub today_completed: i64,
    pub today_created: i64,
    pub avg_repair_time: f64,
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyRepairStatistics {
    pub pending_count: i64,
    pub in_progress_count: i64,
    pub completed_count: i64,
    pub today_completed: i64,
}

pub struct RepairApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RepairApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_orders(&self, query: &RepairOrderQuery) -> Result<RepairOrderListResponse, ApiError> {
        self.client.get_with("/repair/orders", query).await
    }

    pub async fn get_order(&self, id: i64) -> Result<RepairOrderDetail, ApiError> {
        self.client.get(&format!("/repair/orders/{}", id)).await
    }

    pub async fn create_order(&self, data: &CreateRepairRequest) -> Result<RepairOrder, ApiError> {
        self.client.post("/repair/orders", data).await
    }

    pub async fn assign_order(
        &self,
        id: i64,
        data: &AssignRepairRequest,
    ) -> Result<RepairOrder, ApiError> {
        self.client.post(&format!("/repair/orders/{}/assign", id), data).await
    }

    pub async fn start_repair(
        &self,
        id: i64,
        data: &StartRepairRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post(&format!("/repair/orders/{}/start", id), data).await
    }

    pub async fn update_repair(
        &self,
        id: i64,
        data: &UpdateRepairRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post(&format!("/repair/orders/{}/update", id), data).await
    }

    pub async fn confirm_repair(
        &self,
        id: i64,
        data: &ConfirmRepairRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post(&format!("/repair/orders/{}/confirm", id), data).await
    }

    pub async fn audit_repair(
        &self,
        id: i64,
        data: &AuditRepairRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post(&format!("/repair/orders/{}/audit", id), data).await
    }

    pub async fn get_my_tasks(&self) -> Result<Vec<RepairOrder>, ApiError> {
        self.client.get("/repair/my-tasks").await
    }

    pub async fn get_my_stats(&self) -> Result<MyRepairStatistics, ApiError> {
        self.client.get("/repair/my-stats").await
    }

    pub async fn get_statistics(&self) -> Result<RepairStatistics, ApiError> {
        self.client.get("/repair/statistics").await
    }
}
