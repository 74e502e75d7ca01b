//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は api クレートの責務（shared に axum 依存を入れない）
//! - クライアントに返す形は常に `{"msg": "..."}` のみ

use serde::{Deserialize, Serialize};

/// 500 応答で返す固定メッセージ
pub const INTERNAL_SERVER_ERROR_MSG: &str = "Internal Server Error";

/// 未定義ルートで返す固定メッセージ
pub const ROUTE_NOT_FOUND_MSG: &str = "Route not found";

/// エラーレスポンス
///
/// ステータスコードは HTTP レスポンス側で表現し、本文にはメッセージだけを載せる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }

    /// 500 Internal Server Error
    ///
    /// メッセージは固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::new(INTERNAL_SERVER_ERROR_MSG)
    }

    /// 未定義ルート
    pub fn route_not_found() -> Self {
        Self::new(ROUTE_NOT_FOUND_MSG)
    }
}
