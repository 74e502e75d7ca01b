//! # Gazette 共有ユーティリティ
//!
//! domain / infra / api の各クレートから利用される、ビジネスロジックを
//! 含まない共通部品を提供する。
//!
//! - エラーレスポンスの JSON 形状（`{"msg": "..."}`）
//! - ヘルスチェックのレスポンス型
//! - トレーシング初期化とリクエストスパン（feature `observability`）

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
