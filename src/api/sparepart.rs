//! Spare-parts catalogue, inventory and consumption endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ListResponse, MessageResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparePart {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub specification: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub factory_id: Option<i64>,
    #[serde(default)]
    pub factory_name: Option<String>,
    #[serde(default)]
    pub safety_stock: i64,
    #[serde(default)]
    pub current_stock: Option<i64>,
    pub created_at: String,
}

/// Create and update payload
#[derive(Debug, Clone, Serialize)]
pub struct SparePartRequest {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_stock: Option<i64>,
}

pub type SparePartListResponse = ListResponse<SparePart>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SparePartQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: i64,
    pub spare_part_id: i64,
    pub spare_part_code: String,
    pub spare_part_name: String,
    pub factory_id: i64,
    pub factory_name: String,
    pub quantity: i64,
    pub is_low_stock: bool,
    pub updated_at: String,
}

pub type InventoryListResponse = ListResponse<Inventory>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spare_part_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockInRequest {
    pub spare_part_id: i64,
    pub factory_id: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Withdrawal, optionally charged to a repair order or maintenance task
#[derive(Debug, Clone, Serialize)]
pub struct StockOutRequest {
    pub spare_part_id: i64,
    pub factory_id: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub spare_part_id: i64,
    pub spare_part_code: String,
    pub spare_part_name: String,
    pub factory_id: i64,
    pub factory_name: String,
    pub current_stock: i64,
    pub safety_stock: i64,
    pub shortage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    pub id: i64,
    pub spare_part_id: i64,
    pub spare_part_code: String,
    pub spare_part_name: String,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub task_id: Option<i64>,
    pub quantity: i64,
    pub user_id: i64,
    pub user_name: String,
    #[serde(default)]
    pub remark: Option<String>,
    pub created_at: String,
}

pub type ConsumptionListResponse = ListResponse<Consumption>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsumptionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spare_part_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateConsumptionRequest {
    pub spare_part_id: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparePartStatistics {
    pub total_parts: i64,
    pub low_stock_count: i64,
    pub total_stock_value: f64,
    pub monthly_consumption: i64,
}

pub struct SparePartApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SparePartApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_spare_parts(&self, query: &SparePartQuery) -> Result<SparePartListResponse, ApiError> {
        self.client.get_with("/spareparts", query).await
    }

    pub async fn create_spare_part(&self, data: &SparePartRequest) -> Result<SparePart, ApiError> {
        self.client.post("/spareparts", data).await
    }

    pub async fn update_spare_part(
        &self,
        id: i64,
        data: &SparePartRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/spareparts/{}", id), data).await
    }

    pub async fn delete_spare_part(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/spareparts/{}", id)).await
    }

    pub async fn get_inventory(&self, query: &InventoryQuery) -> Result<InventoryListResponse, ApiError> {
        self.client.get_with("/spareparts/inventory", query).await
    }

    pub async fn stock_in(&self, data: &StockInRequest) -> Result<MessageResponse, ApiError> {
        self.client.post("/spareparts/stock-in", data).await
    }

    pub async fn stock_out(&self, data: &StockOutRequest) -> Result<MessageResponse, ApiError> {
        self.client.post("/spareparts/stock-out", data).await
    }

    pub async fn get_low_stock_alerts(&self) -> Result<Vec<LowStockAlert>, ApiError> {
        self.client.get("/spareparts/alerts").await
    }

    pub async fn get_consumptions(
        &self,
        query: &ConsumptionQuery,
    ) -> Result<ConsumptionListResponse, ApiError> {
        self.client.get_with("/spareparts/consumptions", query).await
    }

    pub async fn create_consumption(
        &self,
        data: &CreateConsumptionRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.post("/spareparts/consumptions", data).await
    }

    pub async fn get_statistics(&self) -> Result<SparePartStatistics, ApiError> {
        self.client.get("/spareparts/statistics").await
    }
}
