//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはリソースごとのサブモジュールに配置し、ここで re-export する
//! - ハンドラはパス・クエリ・ボディの解析とレスポンス DTO への変換だけを行う
//! - レスポンスは常にリソース名をキーにした JSON オブジェクト

pub mod api;
pub mod article;
pub mod comment;
pub mod health;
pub mod topic;
pub mod user;

pub use api::{get_endpoints, route_not_found};
pub use article::{
    ArticleState,
    create_article,
    delete_article,
    get_article,
    list_articles,
    vote_article,
};
pub use comment::{CommentState, create_comment, delete_comment, list_comments, vote_comment};
pub use health::{ReadinessState, health_check, readiness_check};
pub use topic::{TopicState, create_topic, list_topics};
pub use user::{UserState, get_user, list_users};
