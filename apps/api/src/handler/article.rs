//! # 記事ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/articles` - 記事一覧（`sort_by`, `order`, `topic`, `limit`, `p`）
//! - `POST /api/articles` - 記事作成
//! - `GET /api/articles/{article_id}` - 記事取得
//! - `PATCH /api/articles/{article_id}` - 投票数の加算
//! - `DELETE /api/articles/{article_id}` - 記事とコメントの削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use gazette_domain::{
    article::{Article, ArticleId, NewArticle},
    listing::ArticleListQuery,
    vote::VoteDelta,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ApiError,
    extract::{ApiJson, ApiQuery, required_string_field, string_field},
    usecase::ArticleUseCaseImpl,
};

/// 記事 API の共有状態
pub struct ArticleState {
    pub usecase: ArticleUseCaseImpl,
}

/// 記事一覧のクエリパラメータ
///
/// ページ番号は `p` を優先し、なければ `page` を使う。
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesParams {
    pub sort_by: Option<String>,
    pub order:   Option<String>,
    pub topic:   Option<String>,
    pub limit:   Option<String>,
    pub p:       Option<String>,
    pub page:    Option<String>,
}

/// 記事作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub author:          Option<Value>,
    pub title:           Option<Value>,
    pub body:            Option<Value>,
    pub topic:           Option<Value>,
    pub article_img_url: Option<Value>,
}

/// 投票リクエスト（記事・コメント共通）
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub inc_votes: Option<Value>,
}

/// 記事 DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ArticleDto {
    pub article_id:      i32,
    pub title:           String,
    pub body:            String,
    pub topic:           String,
    pub author:          String,
    pub created_at:      String,
    pub votes:           i32,
    pub article_img_url: Option<String>,
    pub comment_count:   i64,
}

impl From<&Article> for ArticleDto {
    fn from(article: &Article) -> Self {
        Self {
            article_id:      article.id().as_i32(),
            title:           article.title().to_string(),
            body:            article.body().to_string(),
            topic:           article.topic().to_string(),
            author:          article.author().to_string(),
            created_at:      article.created_at().to_rfc3339(),
            votes:           article.votes(),
            article_img_url: article.article_img_url().map(str::to_string),
            comment_count:   article.comment_count(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticlesResponse {
    pub articles:    Vec<ArticleDto>,
    pub total_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub article: ArticleDto,
}

impl ArticleResponse {
    fn new(article: &Article) -> Json<Self> {
        Json(Self {
            article: ArticleDto::from(article),
        })
    }
}

/// GET /api/articles
///
/// 検証順は `sort_by` → `order` → `limit` → `p`。すべて DB に問い合わせる前に行う。
#[tracing::instrument(skip_all)]
pub async fn list_articles(
    State(state): State<Arc<ArticleState>>,
    ApiQuery(params): ApiQuery<ListArticlesParams>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let query = ArticleListQuery::parse(
        params.sort_by.as_deref(),
        params.order.as_deref(),
        params.topic.as_deref(),
        params.limit.as_deref(),
        params.p.as_deref().or(params.page.as_deref()),
    )?;

    let page = state.usecase.list_articles(&query).await?;

    Ok(Json(ArticlesResponse {
        articles:    page.items.iter().map(ArticleDto::from).collect(),
        total_count: page.total_count,
    }))
}

/// POST /api/articles
///
/// ## レスポンス
///
/// - `201 Created`: 作成された記事（`comment_count` は 0）
/// - `400 Bad Request`: 必須フィールド未入力、型違い
/// - `404 Not Found`: 作者またはトピックが存在しない
#[tracing::instrument(skip_all)]
pub async fn create_article(
    State(state): State<Arc<ArticleState>>,
    ApiJson(req): ApiJson<CreateArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let article = NewArticle::new(
        required_string_field(req.author.as_ref())?,
        required_string_field(req.title.as_ref())?,
        required_string_field(req.body.as_ref())?,
        required_string_field(req.topic.as_ref())?,
        string_field(req.article_img_url.as_ref())?,
    )?;

    let created = state.usecase.create_article(article).await?;

    Ok((StatusCode::CREATED, ArticleResponse::new(&created)))
}

/// GET /api/articles/{article_id}
#[tracing::instrument(skip_all, fields(%article_id))]
pub async fn get_article(
    State(state): State<Arc<ArticleState>>,
    Path(article_id): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id = ArticleId::parse(&article_id)?;

    let article = state.usecase.get_article(id).await?;

    Ok(ArticleResponse::new(&article))
}

/// PATCH /api/articles/{article_id}
///
/// `{"inc_votes": n}` の n を投票数に加算する。負の値も受け付ける。
#[tracing::instrument(skip_all, fields(%article_id))]
pub async fn vote_article(
    State(state): State<Arc<ArticleState>>,
    Path(article_id): Path<String>,
    body: Result<ApiJson<VoteRequest>, ApiError>,
) -> Result<Json<ArticleResponse>, ApiError> {
    // ボディより先に ID を検証する
    let id = ArticleId::parse(&article_id)?;
    let ApiJson(req) = body?;
    let delta = VoteDelta::from_json(req.inc_votes.as_ref())?;

    let article = state.usecase.vote_article(id, delta).await?;

    Ok(ArticleResponse::new(&article))
}

/// DELETE /api/articles/{article_id}
///
/// 記事に属するコメントも同じトランザクションで削除する。
#[tracing::instrument(skip_all, fields(%article_id))]
pub async fn delete_article(
    State(state): State<Arc<ArticleState>>,
    Path(article_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ArticleId::parse(&article_id)?;

    state.usecase.delete_article(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
