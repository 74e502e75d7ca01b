//! # コメント
//!
//! 記事に対するコメント。記事の削除時には同じトランザクションで削除される。

use chrono::{DateTime, Utc};

use crate::{DomainError, article::ArticleId, macros::required_trimmed};

/// コメント作成時に必須フィールドが欠けている場合のメッセージ
pub const MISSING_COMMENT_FIELDS: &str = "Bad request - missing required fields";

define_serial_id! {
    /// コメント ID
    pub struct CommentId {
        invalid: "Invalid comment ID",
    }
}

/// コメントエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id:         CommentId,
    article_id: ArticleId,
    body:       String,
    author:     String,
    votes:      i32,
    created_at: DateTime<Utc>,
}

/// コメントの DB 復元パラメータ
pub struct CommentRecord {
    pub id:         CommentId,
    pub article_id: ArticleId,
    pub body:       String,
    pub author:     String,
    pub votes:      i32,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_db(record: CommentRecord) -> Self {
        Self {
            id:         record.id,
            article_id: record.article_id,
            body:       record.body,
            author:     record.author,
            votes:      record.votes,
            created_at: record.created_at,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn article_id(&self) -> ArticleId {
        self.article_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn votes(&self) -> i32 {
        self.votes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// コメントの新規作成パラメータ
///
/// 記事と投稿者の存在確認は DB の外部キー制約に委ねる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    article_id: ArticleId,
    author:     String,
    body:       String,
}

impl NewComment {
    /// # Errors
    ///
    /// `username` または `body` が空（空白のみを含む）の場合
    pub fn new(article_id: ArticleId, username: &str, body: &str) -> Result<Self, DomainError> {
        let (Some(author), Some(body)) = (required_trimmed(username), required_trimmed(body)) else {
            return Err(DomainError::validation(MISSING_COMMENT_FIELDS));
        };

        Ok(Self {
            article_id,
            author,
            body,
        })
    }

    pub fn article_id(&self) -> ArticleId {
        self.article_id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
