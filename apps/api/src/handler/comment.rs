//! # コメントハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/articles/{article_id}/comments` - 記事のコメント一覧（`limit`, `p`）
//! - `POST /api/articles/{article_id}/comments` - コメント作成
//! - `PATCH /api/comments/{comment_id}` - 投票数の加算
//! - `DELETE /api/comments/{comment_id}` - コメント削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use gazette_domain::{
    article::ArticleId,
    comment::{Comment, CommentId, NewComment},
    listing::Pagination,
    vote::VoteDelta,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::article::VoteRequest;
use crate::{
    error::ApiError,
    extract::{ApiJson, ApiQuery, required_string_field},
    usecase::CommentUseCaseImpl,
};

/// コメント API の共有状態
pub struct CommentState {
    pub usecase: CommentUseCaseImpl,
}

/// コメント一覧のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListCommentsParams {
    pub limit: Option<String>,
    pub p:     Option<String>,
    pub page:  Option<String>,
}

/// コメント作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub username: Option<Value>,
    pub body:     Option<Value>,
}

/// コメント DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CommentDto {
    pub comment_id: i32,
    pub article_id: i32,
    pub body:       String,
    pub author:     String,
    pub votes:      i32,
    pub created_at: String,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            comment_id: comment.id().as_i32(),
            article_id: comment.article_id().as_i32(),
            body:       comment.body().to_string(),
            author:     comment.author().to_string(),
            votes:      comment.votes(),
            created_at: comment.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments:    Vec<CommentDto>,
    pub total_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: CommentDto,
}

impl CommentResponse {
    fn new(comment: &Comment) -> Json<Self> {
        Json(Self {
            comment: CommentDto::from(comment),
        })
    }
}

/// GET /api/articles/{article_id}/comments
#[tracing::instrument(skip_all, fields(%article_id))]
pub async fn list_comments(
    State(state): State<Arc<CommentState>>,
    Path(article_id): Path<String>,
    ApiQuery(params): ApiQuery<ListCommentsParams>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let id = ArticleId::parse(&article_id)?;
    let pagination = Pagination::parse(
        params.limit.as_deref(),
        params.p.as_deref().or(params.page.as_deref()),
    )?;

    let page = state.usecase.list_comments(id, pagination).await?;

    Ok(Json(CommentsResponse {
        comments:    page.items.iter().map(CommentDto::from).collect(),
        total_count: page.total_count,
    }))
}

/// POST /api/articles/{article_id}/comments
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたコメント（投票数 0）
/// - `400 Bad Request`: 不正な記事 ID、必須フィールド未入力、型違い
/// - `404 Not Found`: 記事または投稿者が存在しない
#[tracing::instrument(skip_all, fields(%article_id))]
pub async fn create_comment(
    State(state): State<Arc<CommentState>>,
    Path(article_id): Path<String>,
    body: Result<ApiJson<CreateCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = ArticleId::parse(&article_id)?;
    let ApiJson(req) = body?;
    let comment = NewComment::new(
        id,
        required_string_field(req.username.as_ref())?,
        required_string_field(req.body.as_ref())?,
    )?;

    let created = state.usecase.create_comment(comment).await?;

    Ok((StatusCode::CREATED, CommentResponse::new(&created)))
}

/// PATCH /api/comments/{comment_id}
#[tracing::instrument(skip_all, fields(%comment_id))]
pub async fn vote_comment(
    State(state): State<Arc<CommentState>>,
    Path(comment_id): Path<String>,
    body: Result<ApiJson<VoteRequest>, ApiError>,
) -> Result<Json<CommentResponse>, ApiError> {
    let id = CommentId::parse(&comment_id)?;
    let ApiJson(req) = body?;
    let delta = VoteDelta::from_json(req.inc_votes.as_ref())?;

    let comment = state.usecase.vote_comment(id, delta).await?;

    Ok(CommentResponse::new(&comment))
}

/// DELETE /api/comments/{comment_id}
#[tracing::instrument(skip_all, fields(%comment_id))]
pub async fn delete_comment(
    State(state): State<Arc<CommentState>>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = CommentId::parse(&comment_id)?;

    state.usecase.delete_comment(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
