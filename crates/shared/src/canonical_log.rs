//! # リクエストサマリログ
//!
//! リクエストごとに 1 行のサマリ（Canonical Log Line）を出力する tower Layer。
//! 1 リクエストの結果をこの 1 行だけで追えるようにする。
//!
//! 出力するフィールド:
//!
//! | フィールド | 内容 |
//! |---|---|
//! | `log.type` | 常に `"canonical"` |
//! | `http.method` / `http.path` | クエリ文字列を除いたパス |
//! | `http.status_code` | レスポンスのステータス |
//! | `http.outcome` | `success` / `client_error` / `server_error` |
//! | `http.latency_ms` | ハンドラ完了までの経過時間 |
//! | `request_id` | `X-Request-Id` ヘッダーの値 |
//!
//! `/health` 配下はロードバランサから頻繁に叩かれるため出力しない。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response, StatusCode};
use tower::{Layer, Service};

use crate::observability::REQUEST_ID_HEADER;

/// ステータスコードの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    ClientError,
    ServerError,
}

impl Outcome {
    fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::ServerError
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Success
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
        }
    }
}

/// リクエスト受信時に確定する情報
struct RequestSummary {
    method:     String,
    path:       String,
    request_id: String,
    started_at: Instant,
}

impl RequestSummary {
    /// ヘルスチェックなら `None`
    fn begin<B>(req: &Request<B>) -> Option<Self> {
        let path = req.uri().path();
        if path.starts_with("/health") {
            return None;
        }
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        Some(Self {
            method: req.method().to_string(),
            path: path.to_string(),
            request_id,
            started_at: Instant::now(),
        })
    }

    fn latency_ms(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn responded(self, status: StatusCode) {
        tracing::info!(
            log.r#type = "canonical",
            http.method = %self.method,
            http.path = %self.path,
            http.status_code = status.as_u16(),
            http.outcome = Outcome::of(status).as_str(),
            http.latency_ms = self.latency_ms(),
            request_id = %self.request_id,
            "request completed"
        );
    }

    fn failed(self, error: &dyn std::fmt::Display) {
        tracing::error!(
            log.r#type = "canonical",
            http.method = %self.method,
            http.path = %self.path,
            http.outcome = Outcome::ServerError.as_str(),
            http.latency_ms = self.latency_ms(),
            request_id = %self.request_id,
            error.message = %error,
            "request failed"
        );
    }
}

/// サマリログを出力する Layer
///
/// `SetRequestIdLayer` より内側に置くと `request_id` が埋まる。
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みの inner を取り出して使う
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);
        let summary = RequestSummary::begin(&req);

        Box::pin(async move {
            let result = inner.call(req).await;
            if let Some(summary) = summary {
                match &result {
                    Ok(response) => summary.responded(response.status()),
                    Err(err) => summary.failed(err),
                }
            }
            result
        })
    }
}
