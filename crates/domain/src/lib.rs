//! # Gazette ドメイン層
//!
//! ニュース集約サービスのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`topic`] / [`user`] / [`article`] / [`comment`] - エンティティと値オブジェクト
//! - [`listing`] - 一覧取得の並び替え・ページング条件
//! - [`vote`] - 投票数の増減値
//!
//! ## 使用例
//!
//! ```rust
//! use gazette_domain::{DomainError, article::ArticleId};
//!
//! let id = ArticleId::parse("3").unwrap();
//! assert_eq!(id.as_i32(), 3);
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Article",
//!     id:          id.to_string(),
//! };
//! assert_eq!(error.client_message(), "Article not found");
//! ```

#[macro_use]
mod macros;

pub mod article;
pub mod comment;
pub mod error;
pub mod listing;
pub mod topic;
pub mod user;
pub mod vote;

pub use error::DomainError;
