//! テスト共通フィクスチャ
//!
//! `fixtures/base.sql` の内容に対応する定数とクエリ生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use gazette_domain::{
    article::ArticleId,
    comment::CommentId,
    listing::{ArticleListQuery, Pagination},
};

/// 記事の総数
pub const TOTAL_ARTICLES: i64 = 13;

/// トピック mitch の記事数
pub const MITCH_ARTICLES: i64 = 12;

/// コメント 11 件・votes 100 の記事
pub fn article_with_comments() -> ArticleId {
    ArticleId::from_i32(1)
}

/// コメントのない記事
pub fn article_without_comments() -> ArticleId {
    ArticleId::from_i32(2)
}

/// どの行にも対応しない記事 ID
pub fn missing_article() -> ArticleId {
    ArticleId::from_i32(9999)
}

/// article 9 に属し votes 16 のコメント
pub fn comment_with_16_votes() -> CommentId {
    CommentId::from_i32(1)
}

/// クエリ文字列と同じ形式で記事一覧の条件を組み立てる
pub fn article_query(
    sort_by: Option<&str>,
    order: Option<&str>,
    topic: Option<&str>,
) -> ArticleListQuery {
    ArticleListQuery::parse(sort_by, order, topic, None, None).unwrap()
}

/// クエリ文字列と同じ形式でページングを組み立てる
pub fn pagination(limit: u32, page: u32) -> Pagination {
    Pagination::parse(Some(&limit.to_string()), Some(&page.to_string())).unwrap()
}

/// 全件が 1 ページに収まるページング
pub fn all_rows() -> Pagination {
    pagination(100, 1)
}
