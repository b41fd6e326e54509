//! Organization, equipment type and equipment endpoints.

use serde::{Deserialize, Serialize};

use super::{segment, ApiClient, ApiError, ListResponse, MessageResponse};

// Organization

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub id: i64,
    pub base_id: i64,
    #[serde(default)]
    pub base_name: Option<String>,
    pub code: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: i64,
    pub factory_id: i64,
    #[serde(default)]
    pub factory_name: Option<String>,
    pub code: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaseRequest {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactoryRequest {
    pub base_id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkshopRequest {
    pub factory_id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Serialize)]
struct FactoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_id: Option<i64>,
}

#[derive(Serialize)]
struct WorkshopFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    factory_id: Option<i64>,
}

pub struct OrganizationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrganizationApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_bases(&self) -> Result<Vec<Base>, ApiError> {
        self.client.get("/organization/bases").await
    }

    pub async fn create_base(&self, data: &BaseRequest) -> Result<Base, ApiError> {
        self.client.post("/organization/bases", data).await
    }

    pub async fn update_base(&self, id: i64, data: &BaseRequest) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/organization/bases/{}", id), data).await
    }

    pub async fn delete_base(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/organization/bases/{}", id)).await
    }

    /// Factories, optionally limited to one base
    pub async fn get_factories(&self, base_id: Option<i64>) -> Result<Vec<Factory>, ApiError> {
        let filter = FactoryFilter {
            base_id: base_id.filter(|id| *id != 0),
        };
        self.client.get_with("/organization/factories", &filter).await
    }

    pub async fn create_factory(&self, data: &FactoryRequest) -> Result<Factory, ApiError> {
        self.client.post("/organization/factories", data).await
    }

    pub async fn update_factory(
        &self,
        id: i64,
        data: &FactoryRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/organization/factories/{}", id), data).await
    }

    pub async fn delete_factory(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/organization/factories/{}", id)).await
    }

    /// Workshops, optionally limited to one factory
    pub async fn get_workshops(&self, factory_id: Option<i64>) -> Result<Vec<Workshop>, ApiError> {
        let filter = WorkshopFilter {
            factory_id: factory_id.filter(|id| *id != 0),
        };
        self.client.get_with("/organization/workshops", &filter).await
    }

    pub async fn create_workshop(&self, data: &WorkshopRequest) -> Result<Workshop, ApiError> {
        self.client.post("/organization/workshops", data).await
    }

    pub async fn update_workshop(
        &self,
        id: i64,
        data: &WorkshopRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/organization/workshops/{}", id), data).await
    }

    pub async fn delete_workshop(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/organization/workshops/{}", id)).await
    }
}

// Equipment types

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub inspection_template_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentTypeRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub struct EquipmentTypeApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EquipmentTypeApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_types(&self) -> Result<Vec<EquipmentType>, ApiError> {
        self.client.get("/equipment/types").await
    }

    pub async fn create_type(&self, data: &EquipmentTypeRequest) -> Result<EquipmentType, ApiError> {
        self.client.post("/equipment/types", data).await
    }

    pub async fn update_type(
        &self,
        id: i64,
        data: &EquipmentTypeRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/equipment/types/{}", id), data).await
    }

    pub async fn delete_type(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/equipment/types/{}", id)).await
    }
}

// Equipment

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Running,
    Stopped,
    Maintenance,
    Scrapped,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Running => "running",
            EquipmentStatus::Stopped => "stopped",
            EquipmentStatus::Maintenance => "maintenance",
            EquipmentStatus::Scrapped => "scrapped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "running" => Some(EquipmentStatus::Running),
            "stopped" => Some(EquipmentStatus::Stopped),
            "maintenance" => Some(EquipmentStatus::Maintenance),
            "scrapped" => Some(EquipmentStatus::Scrapped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
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
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    pub status: EquipmentStatus,
    #[serde(default)]
    pub dedicated_maintenance_id: Option<i64>,
    #[serde(default)]
    pub dedicated_maintenance_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub type EquipmentListResponse = ListResponse<Equipment>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentStatistics {
    pub total: i64,
    pub running: i64,
    pub stopped: i64,
    pub maintenance: i64,
    pub scrapped: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EquipmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workshop_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
}

/// Create and update payload
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentRequest {
    pub code: String,
    pub name: String,
    pub type_id: i64,
    pub workshop_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedicated_maintenance_id: Option<i64>,
}

pub struct EquipmentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EquipmentApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_list(&self, query: &EquipmentQuery) -> Result<EquipmentListResponse, ApiError> {
        self.client.get_with("/equipment", query).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Equipment, ApiError> {
        self.client.get(&format!("/equipment/{}", id)).await
    }

    /// Look up the equipment a scanned QR code belongs to
    pub async fn get_by_qr_code(&self, code: &str) -> Result<Equipment, ApiError> {
        self.client.get(&format!("/equipment/qr/{}", segment(code))).await
    }

    pub async fn create(&self, data: &EquipmentRequest) -> Result<Equipment, ApiError> {
        self.client.post("/equipment", data).await
    }

    pub async fn update(&self, id: i64, data: &EquipmentRequest) -> Result<Equipment, ApiError> {
        self.client.put(&format!("/equipment/{}", id), data).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/equipment/{}", id)).await
    }

    pub async fn get_statistics(&self) -> Result<EquipmentStatistics, ApiError> {
        self.client.get("/equipment/statistics").await
    }

    pub async fn get_types(&self) -> Result<Vec<EquipmentType>, ApiError> {
        EquipmentTypeApi::new(self.client).get_types().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn equipment_json(id: i64, code: &str) -> serde_json::Value {
        json!({
            "id": id, "code": code, "name": "CNC Lathe", "type_id": 1, "type_name": "Lathe",
            "workshop_id": 3, "workshop_name": "W1", "factory_id": 2, "qr_code": format!("QR-{code}"),
            "status": "running", "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_forwards_filters_and_paging() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/equipment")
                    .query_param("page", "2")
                    .query_param("page_size", "20")
                    .query_param("status", "running")
                    .query_param_missing("code");
                then.status(200).json_body(json!({
                    "total": 21,
                    "items": [equipment_json(21, "EQ-021")]
                }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let page = client
            .equipment()
            .get_list(&EquipmentQuery {
                page: Some(2),
                page_size: Some(20),
                status: Some(EquipmentStatus::Running),
                ..Default::default()
            })
            .await
            .expect("list");

        mock.assert_async().await;
        assert_eq!(page.total, 21);
        assert_eq!(page.items[0].code, "EQ-021");
        assert_eq!(page.items[0].status, EquipmentStatus::Running);
    }

    #[tokio::test]
    async fn qr_lookup_interpolates_code() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/equipment/qr/EQ-007");
                then.status(200).json_body(equipment_json(7, "EQ-007"));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let equipment = client.equipment().get_by_qr_code("EQ-007").await.expect("qr");
        mock.assert_async().await;
        assert_eq!(equipment.id, 7);
    }

    #[tokio::test]
    async fn factory_filter_is_dropped_when_unset() {
        let server = MockServer::start_async().await;
        let all = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/organization/factories")
                    .query_param_missing("base_id");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let factories = client.organization().get_factories(None).await.expect("factories");
        assert!(factories.is_empty());
        client.organization().get_factories(Some(0)).await.expect("factories");
        all.assert_hits_async(2).await;

        let scoped = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/organization/workshops")
                    .query_param("factory_id", "4");
                then.status(200).json_body(json!([{
                    "id": 1, "factory_id": 4, "code": "W1", "name": "Workshop 1",
                    "created_at": "", "updated_at": ""
                }]));
            })
            .await;
        let workshops = client.organization().get_workshops(Some(4)).await.expect("workshops");
        scoped.assert_async().await;
        assert_eq!(workshops[0].factory_id, 4);
    }

    #[tokio::test]
    async fn delete_and_statistics() {
        let server = MockServer::start_async().await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v1/equipment/5");
                then.status(200).json_body(json!({ "message": "Deleted successfully" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/equipment/statistics");
                then.status(200).json_body(json!({
                    "total": 10, "running": 6, "stopped": 2, "maintenance": 1, "scrapped": 1
                }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let ack = client.equipment().delete(5).await.expect("delete");
        delete.assert_async().await;
        assert_eq!(ack.message, "Deleted successfully");

        let stats = client.equipment().get_statistics().await.expect("stats");
        assert_eq!(stats.total, 10);
        assert_eq!(stats.running + stats.stopped + stats.maintenance + stats.scrapped, 10);
    }
}
