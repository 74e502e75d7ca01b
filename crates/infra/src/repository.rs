//! # リポジトリ実装
//!
//! 各テーブルの永続化操作をトレイトで定義し、PostgreSQL 実装を提供する。
//!
//! - 値のバインドはすべてプレースホルダ経由で行う
//! - 行が存在しない場合は `Option` / `bool` で返し、エラーにはしない
//! - ユースケース層はトレイトオブジェクト経由で利用する

pub mod article_repository;
pub mod comment_repository;
pub mod topic_repository;
pub mod user_repository;

pub use article_repository::{ArticleRepository, PostgresArticleRepository};
pub use comment_repository::{CommentRepository, PostgresCommentRepository};
pub use topic_repository::{PostgresTopicRepository, TopicRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
