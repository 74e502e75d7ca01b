//! # トピックハンドラ
//!
//! - `GET /api/topics` - トピック一覧
//! - `POST /api/topics` - トピック作成

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use gazette_domain::topic::{NewTopic, Topic};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ApiError,
    extract::{ApiJson, required_string_field, string_field},
    usecase::TopicUseCaseImpl,
};

/// トピック API の共有状態
pub struct TopicState {
    pub usecase: TopicUseCaseImpl,
}

/// トピック作成リクエスト
///
/// 型の検証は [`crate::extract::string_field`] で行う。
#[derive(Debug, Deserialize)]
pub struct CreateTopicRequest {
    pub slug:        Option<Value>,
    pub description: Option<Value>,
    pub img_url:     Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TopicDto {
    pub slug:        String,
    pub description: String,
    pub img_url:     Option<String>,
}

impl From<&Topic> for TopicDto {
    fn from(topic: &Topic) -> Self {
        Self {
            slug:        topic.slug().to_string(),
            description: topic.description().to_string(),
            img_url:     topic.img_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub topics: Vec<TopicDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicResponse {
    pub topic: TopicDto,
}

/// GET /api/topics
#[tracing::instrument(skip_all)]
pub async fn list_topics(
    State(state): State<Arc<TopicState>>,
) -> Result<Json<TopicsResponse>, ApiError> {
    let topics = state.usecase.list_topics().await?;

    Ok(Json(TopicsResponse {
        topics: topics.iter().map(TopicDto::from).collect(),
    }))
}

/// POST /api/topics
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたトピック
/// - `400 Bad Request`: 必須フィールド未入力、型違い、slug の重複
#[tracing::instrument(skip_all)]
pub async fn create_topic(
    State(state): State<Arc<TopicState>>,
    ApiJson(req): ApiJson<CreateTopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let topic = NewTopic::new(
        required_string_field(req.slug.as_ref())?,
        required_string_field(req.description.as_ref())?,
        string_field(req.img_url.as_ref())?,
    )?;

    let created = state.usecase.create_topic(topic).await?;

    Ok((
        StatusCode::CREATED,
        Json(TopicResponse {
            topic: TopicDto::from(&created),
        }),
    ))
}
