//! Analytics dashboard endpoints (`/analytics/*`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentAnalytics {
    pub total_equipment: i64,
    pub running_equipment: i64,
    pub stopped_equipment: i64,
    pub maintenance_equipment: i64,
    pub scrapped_equipment: i64,
}

/// Mean time to repair / between failures, in hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MttrMtbf {
    pub mttr: f64,
    pub mtbf: f64,
    pub availability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRate {
    pub inspection_completion_rate: f64,
    pub maintenance_completion_rate: f64,
    pub repair_completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub equipment: EquipmentAnalytics,
    pub mttr_mtbf: MttrMtbf,
    pub tasks: CompletionRate,
    pub pending_inspections: i64,
    pub pending_maintenances: i64,
    pub pending_repairs: i64,
    pub low_stock_alerts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendData {
    pub date: String,
    pub inspection_tasks: i64,
    pub maintenance_tasks: i64,
    pub repair_orders: i64,
    pub downtime_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureAnalysis {
    pub equipment_type_id: i64,
    pub equipment_type_name: String,
    pub failure_count: i64,
    pub total_downtime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFailureEquipment {
    pub equipment_id: i64,
    pub equipment_code: String,
    pub equipment_name: String,
    pub failure_count: i64,
    pub downtime_hours: f64,
    pub mttr: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct FactoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    factory_id: Option<i64>,
}

#[derive(Serialize)]
struct Limit {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_dashboard_overview(&self) -> Result<DashboardOverview, ApiError> {
        self.client.get("/analytics/dashboard").await
    }

    pub async fn get_mttr_mtbf(&self, factory_id: Option<i64>) -> Result<MttrMtbf, ApiError> {
        self.client
            .get_with("/analytics/mttr-mtbf", &FactoryFilter { factory_id })
            .await
    }

    pub async fn get_trend_data(&self, query: &TrendQuery) -> Result<Vec<TrendData>, ApiError> {
        self.client.get_with("/analytics/trends", query).await
    }

    pub async fn get_failure_analysis(&self, limit: Option<u32>) -> Result<Vec<FailureAnalysis>, ApiError> {
        self.client
            .get_with("/analytics/failures", &Limit { limit })
            .await
    }

    pub async fn get_top_failure_equipment(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<TopFailureEquipment>, ApiError> {
        self.client
            .get_with("/analytics/top-failures", &Limit { limit })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn dashboard_overview_decodes_nested_sections() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/analytics/dashboard");
                then.status(200).json_body(json!({
                    "equipment": {
                        "total_equipment": 12, "running_equipment": 9, "stopped_equipment": 1,
                        "maintenance_equipment": 1, "scrapped_equipment": 1
                    },
                    "mttr_mtbf": { "mttr": 2.5, "mtbf": 120.0, "availability": 0.98 },
                    "tasks": {
                        "inspection_completion_rate": 0.9,
                        "maintenance_completion_rate": 0.8,
                        "repair_completion_rate": 0.75
                    },
                    "pending_inspections": 3, "pending_maintenances": 2,
                    "pending_repairs": 1, "low_stock_alerts": 4
                }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let overview = client.analytics().get_dashboard_overview().await.expect("overview");
        assert_eq!(overview.equipment.total_equipment, 12);
        assert_eq!(overview.mttr_mtbf.mtbf, 120.0);
        assert_eq!(overview.low_stock_alerts, 4);
    }

    #[tokio::test]
    async fn trends_and_limits_forward_query() {
        let server = MockServer::start_async().await;
        let trends = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/analytics/trends")
                    .query_param("start_date", "2024-01-01")
                    .query_param("end_date", "2024-01-07");
                then.status(200).json_body(json!([{
                    "date": "2024-01-01", "inspection_tasks": 4, "maintenance_tasks": 1,
                    "repair_orders": 2, "downtime_hours": 3.5
                }]));
            })
            .await;
        let top = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/analytics/top-failures")
                    .query_param("limit", "5");
                then.status(200).json_body(json!([]));
            })
            .await;
        let mttr = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/analytics/mttr-mtbf")
                    .query_param_missing("factory_id");
                then.status(200).json_body(json!({ "mttr": 1.0, "mtbf": 2.0, "availability": 0.5 }));
            })
            .await;

        let client = authed_client_for(&server, "t");
        let analytics = client.analytics();

        let points = analytics
            .get_trend_data(&TrendQuery {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                end_date: NaiveDate::from_ymd_opt(2024, 1, 7),
            })
            .await
            .expect("trends");
        assert_eq!(points[0].repair_orders, 2);

        assert!(analytics.get_top_failure_equipment(Some(5)).await.expect("top").is_empty());
        analytics.get_mttr_mtbf(None).await.expect("mttr");

        trends.assert_async().await;
        top.assert_async().await;
        mttr.assert_async().await;
    }
}
