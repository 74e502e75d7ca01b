//! # リクエスト抽出
//!
//! axum 標準の抽出器をラップし、失敗時も `{"msg": "..."}` 形式で返す。
//!
//! リクエストボディのフィールドは `serde_json::Value` のまま受け取り、
//! 型の検証はここで行う。未指定と型違いを区別してメッセージを変えるため。

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, INVALID_DATA_TYPE, INVALID_QUERY_STRING, INVALID_REQUEST_BODY};

/// JSON ボディ抽出器
///
/// 構文エラーや `Content-Type` 不一致は 400 `Invalid request body` にする。
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "JSON ボディの解析に失敗しました");
            ApiError::BadRequest(INVALID_REQUEST_BODY.to_string())
        })?;
        Ok(Self(value))
    }
}

/// クエリ文字列抽出器
///
/// キーの重複などデシリアライズの失敗は 400 `Invalid query string` にする。
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "クエリ文字列の解析に失敗しました");
                ApiError::BadRequest(INVALID_QUERY_STRING.to_string())
            })?;
        Ok(Self(value))
    }
}

/// 文字列フィールドを取り出す
///
/// 未指定と `null` は `Ok(None)`、文字列以外は 400 `Invalid data type`。
pub fn string_field(value: Option<&Value>) -> Result<Option<&str>, ApiError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ApiError::BadRequest(INVALID_DATA_TYPE.to_string())),
    }
}

/// 必須の文字列フィールドを取り出す。未指定は空文字として扱う
///
/// 空文字はドメイン層の検証で「必須フィールド未入力」になる。
pub fn required_string_field(value: Option<&Value>) -> Result<&str, ApiError> {
    Ok(string_field(value)?.unwrap_or_default())
}
