//! Knowledge base endpoints (`/knowledge`).

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ListResponse, MessageResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub equipment_type_id: Option<i64>,
    #[serde(default)]
    pub equipment_type_name: Option<String>,
    #[serde(default)]
    pub fault_phenomenon: Option<String>,
    #[serde(default)]
    pub cause_analysis: Option<String>,
    pub solution: String,
    pub source_type: String,
    #[serde(default)]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: i64,
    #[serde(default)]
    pub creator_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub type KnowledgeArticleListResponse = ListResponse<KnowledgeArticle>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateKnowledgeArticleRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_phenomenon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause_analysis: Option<String>,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateKnowledgeArticleRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_phenomenon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause_analysis: Option<String>,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Turn a closed repair order into an article
#[derive(Debug, Clone, Serialize)]
pub struct ConvertFromRepairRequest {
    pub order_id: i64,
    pub title: String,
    pub fault_phenomenon: String,
    pub cause_analysis: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    keyword: &'a str,
}

pub struct KnowledgeApi<'a> {
    client: &'a ApiClient,
}

impl<'a> KnowledgeApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_articles(
        &self,
        query: &KnowledgeQuery,
    ) -> Result<KnowledgeArticleListResponse, ApiError> {
        self.client.get_with("/knowledge", query).await
    }

    pub async fn get_article(&self, id: i64) -> Result<KnowledgeArticle, ApiError> {
        self.client.get(&format!("/knowledge/{}", id)).await
    }

    pub async fn create_article(
        &self,
        data: &CreateKnowledgeArticleRequest,
    ) -> Result<KnowledgeArticle, ApiError> {
        self.client.post("/knowledge", data).await
    }

    pub async fn update_article(
        &self,
        id: i64,
        data: &UpdateKnowledgeArticleRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client.put(&format!("/knowledge/{}", id), data).await
    }

    pub async fn delete_article(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.client.delete(&format!("/knowledge/{}", id)).await
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<KnowledgeArticle>, ApiError> {
        self.client
            .get_with("/knowledge/search", &SearchQuery { keyword })
            .await
    }

    pub async fn convert_from_repair(
        &self,
        data: &ConvertFromRepairRequest,
    ) -> Result<KnowledgeArticle, ApiError> {
        self.client.post("/knowledge/convert-repair", data).await
    }
}
