//! # API エラーハンドリング
//!
//! ハンドラ・ユースケースが返すエラーと、HTTP レスポンスへの変換規則を定義する。
//!
//! ## エラーの流れ
//!
//! ```text
//! DomainError / InfraError
//!        ↓ From
//! ApiError（ハンドラの戻り値）
//!        ↓ IntoResponse（暫定レスポンス + extensions に ApiError を格納）
//! middleware::map_errors（リクエストパスを加味して resolve し、最終レスポンスを書く）
//! ```
//!
//! DB の SQLSTATE 22P02 はアクセス中のリソースによってメッセージが変わるため、
//! 最終的なステータスとメッセージはパスを知っているミドルウェアで決める。
//! レスポンス本文は常に `{"msg": "..."}`。

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gazette_domain::DomainError;
use gazette_infra::{InfraError, SqlState};
use gazette_shared::{ErrorResponse, error_response::INTERNAL_SERVER_ERROR_MSG};
use thiserror::Error;
use tracing_error::SpanTrace;

pub const INVALID_ARTICLE_ID: &str = "Invalid article_id";
pub const INVALID_COMMENT_ID: &str = "Invalid comment ID";
pub const MISSING_REQUIRED_FIELDS: &str = "Bad request - missing required fields";
pub const DANGLING_REFERENCE: &str = "Article not found or user does not exist";
pub const RESOURCE_ALREADY_EXISTS: &str = "Resource already exists";
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const INVALID_QUERY_STRING: &str = "Invalid query string";
pub const VOTES_OUT_OF_RANGE: &str = "Votes out of range";
pub const INVALID_DATA_TYPE: &str = "Invalid data type";
pub const NO_USERS_FOUND: &str = "No users found";

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 不正なリクエスト（400）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// リソースが見つからない（404）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 一意キーの重複（400）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// データベースエラー。SQLSTATE によってステータスが変わる
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー（500）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let msg = err.client_message();
        match err {
            DomainError::Validation(_) => Self::BadRequest(msg),
            DomainError::NotFound { .. } => Self::NotFound(msg),
            DomainError::Conflict(_) => Self::Conflict(msg),
        }
    }
}

impl ApiError {
    /// ログ出力用のスパントレース（DB エラーのみ保持する）
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Database(e) => Some(e.span_trace()),
            _ => None,
        }
    }
}

/// エラーをステータスコードとクライアント向けメッセージに変換する
///
/// 規則は上から順に適用する:
///
/// 1. 明示的なステータスを持つエラーはメッセージをそのまま返す（`Conflict` は 400）
/// 2. 22P02 は 400。パスに `/comments/` を含めばコメント ID、それ以外は記事 ID の誤り
/// 3. 23502 は 400
/// 4. 23503 は 404
/// 5. 23505 は 400
/// 6. 22003 は 400（投票数が INTEGER の範囲を超えた）
/// 7. それ以外は 500（固定メッセージ）
pub fn resolve(error: &ApiError, path: &str) -> (StatusCode, String) {
    match error {
        ApiError::BadRequest(msg) | ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        ApiError::Database(e) => match e.sql_state() {
            Some(SqlState::InvalidTextRepresentation) => {
                let msg = if path.contains("/comments/") {
                    INVALID_COMMENT_ID
                } else {
                    INVALID_ARTICLE_ID
                };
                (StatusCode::BAD_REQUEST, msg.to_string())
            }
            Some(SqlState::NotNullViolation) => {
                (StatusCode::BAD_REQUEST, MISSING_REQUIRED_FIELDS.to_string())
            }
            Some(SqlState::ForeignKeyViolation) => {
                (StatusCode::NOT_FOUND, DANGLING_REFERENCE.to_string())
            }
            Some(SqlState::UniqueViolation) => {
                (StatusCode::BAD_REQUEST, RESOURCE_ALREADY_EXISTS.to_string())
            }
            Some(SqlState::NumericValueOutOfRange) => {
                (StatusCode::BAD_REQUEST, VOTES_OUT_OF_RANGE.to_string())
            }
            None => internal_error(),
        },
        ApiError::Internal(_) => internal_error(),
    }
}

fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR_MSG.to_string(),
    )
}

/// `{"msg": ...}` 形式のレスポンスを組み立てる
pub fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(msg))).into_response()
}

impl IntoResponse for ApiError {
    /// パスを考慮しない暫定レスポンスを返す
    ///
    /// 元のエラーは extensions に格納し、`map_errors` ミドルウェアが
    /// リクエストパスを使って最終的なレスポンスに書き換える。
    fn into_response(self) -> Response {
        let (status, msg) = resolve(&self, "");
        let mut response = error_response(status, msg);
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}
