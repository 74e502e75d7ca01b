//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗や、参照先エンティティの不在を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `Conflict` | 400 Bad Request | 一意キーの重複 |
//!
//! `Validation` と `Conflict` が保持する文字列はそのままクライアントに返す。
//!
//! ```rust
//! use gazette_domain::DomainError;
//!
//! fn validate_slug(slug: &str) -> Result<(), DomainError> {
//!     if slug.trim().is_empty() {
//!         return Err(DomainError::Validation("Missing required fields".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_slug("  ").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、`{"msg": ...}` 形式のレスポンスに変換する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - クエリパラメータが許可リスト外
    /// - パスパラメータが整数として解釈できない
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` にはエンティティの種類（"Article", "Topic" など）を指定する。
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Article", "Comment", "Topic", "User"）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 競合エラー（一意キーの重複）
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    /// クライアントに返すメッセージ
    ///
    /// `NotFound` は識別子を含めず `"{entity_type} not found"` とする。
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Conflict(msg) => msg.clone(),
            Self::NotFound { entity_type, .. } => format!("{entity_type} not found"),
        }
    }

    pub(crate) fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }
}
