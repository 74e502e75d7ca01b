//! # CommentRepository
//!
//! コメントの永続化を担当するリポジトリ。
//!
//! 記事ごとのコメント一覧は `created_at DESC` で返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gazette_domain::{
    article::ArticleId,
    comment::{Comment, CommentId, CommentRecord, NewComment},
    listing::{Page, Pagination},
    vote::VoteDelta,
};
use sqlx::PgPool;

use crate::{db::TxContext, error::InfraError};

/// コメントリポジトリトレイト
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// 記事のコメントを新しい順に 1 ページ分取得する
    async fn find_page_by_article(
        &self,
        article_id: ArticleId,
        pagination: Pagination,
    ) -> Result<Page<Comment>, InfraError>;

    /// コメントを作成し、作成された行を返す
    ///
    /// 記事・投稿者が存在しない場合は外部キー制約違反（23503）になる。
    async fn insert(&self, comment: &NewComment) -> Result<Comment, InfraError>;

    /// 投票数を加算し、更新後のコメントを返す。コメントが存在しなければ `None`
    async fn add_votes(
        &self,
        id: CommentId,
        delta: VoteDelta,
    ) -> Result<Option<Comment>, InfraError>;

    /// コメントを削除する。削除した場合は `true`
    async fn delete(&self, id: CommentId) -> Result<bool, InfraError>;

    /// 記事に属するコメントをすべて削除し、削除件数を返す
    async fn delete_by_article(
        &self,
        tx: &mut TxContext,
        article_id: ArticleId,
    ) -> Result<u64, InfraError>;
}

/// DB の comments テーブルの行を表す中間構造体
#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: i32,
    article_id: i32,
    body:       String,
    author:     String,
    votes:      i32,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment::from_db(CommentRecord {
            id:         CommentId::from_i32(row.comment_id),
            article_id: ArticleId::from_i32(row.article_id),
            body:       row.body,
            author:     row.author,
            votes:      row.votes,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL 実装の CommentRepository
#[derive(Debug, Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%article_id))]
    async fn find_page_by_article(
        &self,
        article_id: ArticleId,
        pagination: Pagination,
    ) -> Result<Page<Comment>, InfraError> {
        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE article_id = $1")
                .bind(article_id.as_i32())
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, article_id, body, author, votes, created_at
            FROM comments
            WHERE article_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(article_id.as_i32())
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Comment::from).collect(),
            total_count,
        })
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(article_id = %comment.article_id(), author = %comment.author())
    )]
    async fn insert(&self, comment: &NewComment) -> Result<Comment, InfraError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (article_id, author, body)
            VALUES ($1, $2, $3)
            RETURNING comment_id, article_id, body, author, votes, created_at
            "#,
        )
        .bind(comment.article_id().as_i32())
        .bind(comment.author())
        .bind(comment.body())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %delta))]
    async fn add_votes(
        &self,
        id: CommentId,
        delta: VoteDelta,
    ) -> Result<Option<Comment>, InfraError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET votes = votes + $1
            WHERE comment_id = $2
            RETURNING comment_id, article_id, body, author, votes, created_at
            "#,
        )
        .bind(delta.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Comment::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: CommentId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%article_id))]
    async fn delete_by_article(
        &self,
        tx: &mut TxContext,
        article_id: ArticleId,
    ) -> Result<u64, InfraError> {
        let result = sqlx::query("DELETE FROM comments WHERE article_id = $1")
            .bind(article_id.as_i32())
            .execute(tx.conn()?)
            .await?;

        Ok(result.rows_affected())
    }
}
