//! # Gazette インフラ層
//!
//! PostgreSQL との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: 接続プールの作成、マイグレーション、トランザクション
//! - **リポジトリ実装**: topics / users / articles / comments の永続化
//! - **エラー分類**: DB が拒否したエラーを SQLSTATE で分類する
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと PostgreSQL 実装
//! - `mock` - インメモリ実装（feature `test-utils`）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use gazette_infra::{db, repository::{ArticleRepository, PostgresArticleRepository}};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/gazette", 10).await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let articles = PostgresArticleRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind, SqlState};
