//! # 記事
//!
//! トピックに属し、ユーザーが投稿する記事。
//! `comment_count` は保存されず、取得時にコメント数から算出される。

use chrono::{DateTime, Utc};

use crate::{DomainError, macros::required_trimmed};

/// 画像 URL を指定せずに作成した記事に設定する画像
pub const DEFAULT_ARTICLE_IMG_URL: &str = "http://defaultimage.com/default.jpg";

/// 記事作成時に必須フィールドが欠けている場合のメッセージ
pub const MISSING_ARTICLE_FIELDS: &str = "Missing required fields (author, title, body, topic)";

define_serial_id! {
    /// 記事 ID
    pub struct ArticleId {
        invalid: "Invalid article_id",
    }
}

/// 記事エンティティ
///
/// API が返す記事は常にコメント数を伴う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id:              ArticleId,
    title:           String,
    body:            String,
    topic:           String,
    author:          String,
    created_at:      DateTime<Utc>,
    votes:           i32,
    article_img_url: Option<String>,
    comment_count:   i64,
}

/// 記事の DB 復元パラメータ
pub struct ArticleRecord {
    pub id:              ArticleId,
    pub title:           String,
    pub body:            String,
    pub topic:           String,
    pub author:          String,
    pub created_at:      DateTime<Utc>,
    pub votes:           i32,
    pub article_img_url: Option<String>,
    pub comment_count:   i64,
}

impl Article {
    /// 既存のデータから復元する
    pub fn from_db(record: ArticleRecord) -> Self {
        Self {
            id:              record.id,
            title:           record.title,
            body:            record.body,
            topic:           record.topic,
            author:          record.author,
            created_at:      record.created_at,
            votes:           record.votes,
            article_img_url: record.article_img_url,
            comment_count:   record.comment_count,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn votes(&self) -> i32 {
        self.votes
    }

    pub fn article_img_url(&self) -> Option<&str> {
        self.article_img_url.as_deref()
    }

    pub fn comment_count(&self) -> i64 {
        self.comment_count
    }
}

/// 記事の新規作成パラメータ
///
/// 作者とトピックの存在確認は DB の外部キー制約に委ねる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    author:          String,
    title:           String,
    body:            String,
    topic:           String,
    article_img_url: String,
}

impl NewArticle {
    /// # Errors
    ///
    /// `author` / `title` / `body` / `topic` のいずれかが空（空白のみを含む）の場合
    pub fn new(
        author: &str,
        title: &str,
        body: &str,
        topic: &str,
        article_img_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        let (Some(author), Some(title), Some(body), Some(topic)) = (
            required_trimmed(author),
            required_trimmed(title),
            required_trimmed(body),
            required_trimmed(topic),
        ) else {
            return Err(DomainError::validation(MISSING_ARTICLE_FIELDS));
        };

        let article_img_url = article_img_url
            .and_then(required_trimmed)
            .unwrap_or_else(|| DEFAULT_ARTICLE_IMG_URL.to_string());

        Ok(Self {
            author,
            title,
            body,
            topic,
            article_img_url,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn article_img_url(&self) -> &str {
        &self.article_img_url
    }
}
