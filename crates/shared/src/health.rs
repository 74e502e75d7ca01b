//! # ヘルスチェック応答
//!
//! - `GET /health`: プロセスが応答できるか。依存先は見ない
//! - `GET /health/ready`: 依存先（データベース）を確認し、結果を `checks` に並べる
//!
//! ```json
//! { "status": "not_ready", "checks": { "database": "error" } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Liveness 応答
///
/// ```
/// use gazette_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("0.1.0");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:  String,
    /// Cargo.toml のバージョン
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status:  "healthy".to_string(),
            version: version.into(),
        }
    }
}

/// 依存先 1 件の確認結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

impl CheckStatus {
    /// 確認処理の結果から変換する
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() { Self::Ok } else { Self::Error }
    }
}

/// Readiness 全体の判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// Readiness 応答
///
/// `checks` は名前順に出力する。
///
/// ```
/// use gazette_shared::{CheckStatus, ReadinessResponse, ReadinessStatus};
///
/// let response = ReadinessResponse::from_checks([("database", CheckStatus::Ok)]);
/// assert_eq!(response.status, ReadinessStatus::Ready);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 一つでも `Error` があれば `NotReady`。確認項目がなければ `Ready`
    pub fn from_checks<'a>(checks: impl IntoIterator<Item = (&'a str, CheckStatus)>) -> Self {
        let checks: BTreeMap<String, CheckStatus> = checks
            .into_iter()
            .map(|(name, status)| (name.to_string(), status))
            .collect();
        let status = if checks.values().all(|c| *c == CheckStatus::Ok) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, checks }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
