//! # API ドキュメントハンドラ
//!
//! - `GET /api` - 利用可能なエンドポイントの説明
//! - 未定義ルートへのフォールバック

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gazette_shared::ErrorResponse;
use serde_json::Value;

use crate::error::ApiError;

/// ビルド時に埋め込むエンドポイント説明
const ENDPOINTS_JSON: &str = include_str!("../../endpoints.json");

/// GET /api
pub async fn get_endpoints() -> Result<Json<Value>, ApiError> {
    let endpoints = serde_json::from_str(ENDPOINTS_JSON)
        .map_err(|e| ApiError::Internal(format!("endpoints.json の解析に失敗しました: {e}")))?;
    Ok(Json(endpoints))
}

/// 未定義ルートは 404 `Route not found`
pub async fn route_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::route_not_found())).into_response()
}
