//! # アプリケーション構築
//!
//! 依存（リポジトリ・State）の組み立てとルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, patch},
};
use gazette_infra::{
    db::{PgTransactionManager, TransactionManager},
    repository::{
        ArticleRepository,
        CommentRepository,
        PostgresArticleRepository,
        PostgresCommentRepository,
        PostgresTopicRepository,
        PostgresUserRepository,
        TopicRepository,
        UserRepository,
    },
};
use gazette_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use sqlx::PgPool;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        ArticleState,
        CommentState,
        ReadinessState,
        TopicState,
        UserState,
        create_article,
        create_comment,
        create_topic,
        delete_article,
        delete_comment,
        get_article,
        get_endpoints,
        get_user,
        health_check,
        list_articles,
        list_comments,
        list_topics,
        list_users,
        readiness_check,
        route_not_found,
        vote_article,
        vote_comment,
    },
    middleware::map_errors,
    usecase::{ArticleUseCaseImpl, CommentUseCaseImpl, TopicUseCaseImpl, UserUseCaseImpl},
};

/// ユースケースに注入するリポジトリ群
#[derive(Clone)]
pub struct Repositories {
    pub topics:     Arc<dyn TopicRepository>,
    pub users:      Arc<dyn UserRepository>,
    pub articles:   Arc<dyn ArticleRepository>,
    pub comments:   Arc<dyn CommentRepository>,
    pub tx_manager: Arc<dyn TransactionManager>,
}

impl Repositories {
    /// PostgreSQL 実装で組み立てる
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            topics:     Arc::new(PostgresTopicRepository::new(pool.clone())),
            users:      Arc::new(PostgresUserRepository::new(pool.clone())),
            articles:   Arc::new(PostgresArticleRepository::new(pool.clone())),
            comments:   Arc::new(PostgresCommentRepository::new(pool.clone())),
            tx_manager: Arc::new(PgTransactionManager::new(pool.clone())),
        }
    }
}

/// ルーターを構築する
///
/// リポジトリ → ユースケース → State → Router の順に組み立てる。
pub fn build_app(repositories: Repositories, readiness_state: Arc<ReadinessState>) -> Router {
    let topic_state = Arc::new(TopicState {
        usecase: TopicUseCaseImpl::new(repositories.topics.clone()),
    });
    let user_state = Arc::new(UserState {
        usecase: UserUseCaseImpl::new(repositories.users.clone()),
    });
    let article_state = Arc::new(ArticleState {
        usecase: ArticleUseCaseImpl::new(
            repositories.articles.clone(),
            repositories.comments.clone(),
            repositories.topics.clone(),
            repositories.tx_manager.clone(),
        ),
    });
    let comment_state = Arc::new(CommentState {
        usecase: CommentUseCaseImpl::new(repositories.articles, repositories.comments),
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state)
        .route("/api", get(get_endpoints))
        .merge(
            Router::new()
                .route("/api/topics", get(list_topics).post(create_topic))
                .with_state(topic_state),
        )
        .merge(
            Router::new()
                .route("/api/articles", get(list_articles).post(create_article))
                .route(
                    "/api/articles/{article_id}",
                    get(get_article).patch(vote_article).delete(delete_article),
                )
                .with_state(article_state),
        )
        .merge(
            Router::new()
                .route(
                    "/api/articles/{article_id}/comments",
                    get(list_comments).post(create_comment),
                )
                .route(
                    "/api/comments/{comment_id}",
                    patch(vote_comment).delete(delete_comment),
                )
                .with_state(comment_state),
        )
        .merge(
            Router::new()
                .route("/api/users", get(list_users))
                .route("/api/users/{username}", get(get_user))
                .with_state(user_state),
        )
        // パスが一致してメソッドだけ違う場合も 404。登録済みのルートにのみ効くため merge の後に置く
        .method_not_allowed_fallback(route_not_found)
        .fallback(route_not_found)
        // レイヤー順序: 下に書いたものが外側
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: request_id を含むスパンを作成
        // 3. CanonicalLogLineLayer: リクエスト完了時に 1 行サマリログを出力
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 5. map_errors（最内）: ApiError をパスに応じた最終レスポンスに変換
        .layer(from_fn(map_errors))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
