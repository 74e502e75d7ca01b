//! # ヘルスチェックハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /health` - プロセスが稼働しているか（依存先は確認しない）
//! - `GET /health/ready` - データベースに接続できるか
//!
//! ## レスポンス例
//!
//! ```json
//! { "status": "ready", "checks": { "database": "ok" } }
//! ```

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use gazette_infra::db;
use gazette_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::PgPool;

/// 疎通確認のタイムアウト
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Readiness Check の共有状態
pub struct ReadinessState {
    pub pool: PgPool,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// GET /health/ready
///
/// すべての依存先が利用可能なら 200、一つでも失敗すれば 503。
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let response = ReadinessResponse::from_checks([("database", check_database(&state.pool).await)]);

    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

async fn check_database(pool: &PgPool) -> CheckStatus {
    let result = match tokio::time::timeout(PING_TIMEOUT, db::ping(pool)).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err(format!("timed out after {}s", PING_TIMEOUT.as_secs())),
    };
    if let Err(reason) = &result {
        tracing::warn!(%reason, "データベースの疎通確認に失敗しました");
    }
    CheckStatus::from_result(&result)
}
