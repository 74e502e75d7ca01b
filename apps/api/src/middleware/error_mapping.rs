//! # エラー変換ミドルウェア
//!
//! ハンドラが返した [`ApiError`] を、リクエストパスを加味して最終的な
//! `{"msg": "..."}` レスポンスに書き換える。
//!
//! 500 になるエラーはここで `error` レベルのログを出す（スパントレース付き）。
//! それ以外のエラーは `debug` レベルに留める。

use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::{ApiError, error_response, resolve};

/// エラーレスポンスをパスに応じて書き換える
pub async fn map_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    let Some(error) = response.extensions_mut().remove::<Arc<ApiError>>() else {
        return response;
    };

    let (status, msg) = resolve(&error, &path);
    if status.is_server_error() {
        match error.span_trace() {
            Some(span_trace) => tracing::error!(
                error = %error,
                %path,
                "リクエスト処理中にエラーが発生しました\n{span_trace}"
            ),
            None => tracing::error!(error = %error, %path, "リクエスト処理中にエラーが発生しました"),
        }
    } else {
        tracing::debug!(error = %error, %path, status = status.as_u16(), "クライアントエラー");
    }

    error_response(status, msg)
}
