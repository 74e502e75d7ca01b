//! HTTP テスト共通ヘルパー
//!
//! インメモリの [`MockStore`] で `build_app` を組み立て、
//! `tower::ServiceExt::oneshot` でリクエストを送る。

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use gazette_api::{
    app_builder::{Repositories, build_app},
    handler::ReadinessState,
};
use gazette_infra::mock::{MockStore, MockTransactionManager};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

/// コメント 11 件・votes 100 の記事
pub const ARTICLE_WITH_COMMENTS: i32 = 1;
/// コメントのない記事
pub const ARTICLE_WITHOUT_COMMENTS: i32 = 2;
/// article 3 に属し votes 16 のコメント
pub const COMMENT_WITH_16_VOTES: i32 = 1;
/// 記事の総数
pub const TOTAL_ARTICLES: i64 = 5;
/// トピック mitch の記事数
pub const MITCH_ARTICLES: i64 = 4;

/// テストデータを投入したストア
///
/// - topics: cats, mitch, paper（paper は記事なし）
/// - users: butter_bridge, icellusedkars, lurker, rogersop
/// - articles: id 1〜5（作成日時は id 順に新しくなる）
/// - comments: comment 1（article 3、votes 16）、article 1 に 11 件、article 3 にもう 1 件
pub fn seeded_store() -> MockStore {
    let store = MockStore::new();
    store.add_topic("mitch", "The man, the Mitch, the legend");
    store.add_topic("cats", "Not dogs");
    store.add_topic("paper", "what books are made of");
    store.add_user("butter_bridge", "jonny");
    store.add_user("icellusedkars", "sam");
    store.add_user("rogersop", "paul");
    store.add_user("lurker", "do_nothing");

    let first = store.add_article("Living in the shadow of a great man", "mitch", "butter_bridge", 100);
    store.add_article("Sony Vaio; or, The Laptop", "mitch", "icellusedkars", 0);
    let third = store.add_article("Eight pug gifs that remind me of mitch", "mitch", "icellusedkars", -5);
    store.add_article("UNCOVERED: catspiracy to bring down democracy", "cats", "rogersop", 3);
    store.add_article("A", "mitch", "rogersop", 7);

    store.add_comment(third, "butter_bridge", 16);
    for votes in 0..11 {
        store.add_comment(first, "icellusedkars", votes);
    }
    store.add_comment(third, "icellusedkars", 0);
    store
}

/// MockStore で組み立てたアプリケーション
///
/// Readiness Check 用のプールは接続できないアドレスを指す。
pub fn app(store: &MockStore) -> Router {
    let repositories = Repositories {
        topics:     Arc::new(store.clone()),
        users:      Arc::new(store.clone()),
        articles:   Arc::new(store.clone()),
        comments:   Arc::new(store.clone()),
        tx_manager: Arc::new(MockTransactionManager),
    };
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://gazette@127.0.0.1:1/gazette")
        .unwrap();
    build_app(repositories, Arc::new(ReadinessState { pool }))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    without_body(Method::DELETE, uri)
}

/// ボディも `Content-Type` も持たないリクエスト
pub fn without_body(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: Method, uri: &str, body: Value) -> Request<Body> {
    raw_json(method, uri, &body.to_string())
}

/// `Content-Type: application/json` で任意の文字列を送る（壊れた JSON 用）
pub fn raw_json(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// リクエストを送り、ステータスと JSON 本文を返す。本文が空なら `Value::Null`
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// `{"msg": ...}` のメッセージ
pub fn msg(body: &Value) -> &str {
    body["msg"].as_str().unwrap()
}
