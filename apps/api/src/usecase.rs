//! # ユースケース層
//!
//! API のビジネスロジックを実装する。
//!
//! - リポジトリは `Arc<dyn Trait>` で外部から注入する
//! - ハンドラは薄く保ち、存在確認や検証の順序はユースケースに集約する

pub mod article;
pub mod comment;
pub mod topic;
pub mod user;

pub use article::ArticleUseCaseImpl;
pub use comment::CommentUseCaseImpl;
pub use topic::TopicUseCaseImpl;
pub use user::UserUseCaseImpl;
