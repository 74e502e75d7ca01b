//! # ArticleRepository
//!
//! 記事の永続化を担当するリポジトリ。
//!
//! - 取得する記事には常にコメント数（`comment_count`）を付与する
//! - 一覧の並び替えは [`ArticleSortKey`] / [`SortOrder`] から固定の SQL 断片に変換する
//! - 削除はコメントの削除と同じトランザクションで行うため [`TxContext`] を要求する

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gazette_domain::{
    article::{Article, ArticleId, ArticleRecord, NewArticle},
    listing::{ArticleListQuery, ArticleSortKey, Page, SortOrder},
    vote::VoteDelta,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{db::TxContext, error::InfraError};

/// 記事リポジトリトレイト
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// ID で記事を取得する
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, InfraError>;

    /// 記事が存在するか確認する
    async fn exists(&self, id: ArticleId) -> Result<bool, InfraError>;

    /// 条件に合う記事を 1 ページ分取得する
    ///
    /// `total_count` はページングを無視した件数。
    async fn find_page(&self, query: &ArticleListQuery) -> Result<Page<Article>, InfraError>;

    /// 記事を作成し、作成された行を返す（`comment_count` は 0）
    ///
    /// 作者・トピックが存在しない場合は外部キー制約違反（23503）になる。
    async fn insert(&self, article: &NewArticle) -> Result<Article, InfraError>;

    /// 投票数を加算し、更新後の記事を返す。記事が存在しなければ `None`
    async fn add_votes(
        &self,
        id: ArticleId,
        delta: VoteDelta,
    ) -> Result<Option<Article>, InfraError>;

    /// 記事を削除する。削除した場合は `true`
    ///
    /// 先にコメントを削除しておく必要がある。
    async fn delete(&self, tx: &mut TxContext, id: ArticleId) -> Result<bool, InfraError>;
}

/// DB の articles テーブルとコメント数を表す中間構造体
#[derive(sqlx::FromRow)]
struct ArticleRow {
    article_id:      i32,
    title:           String,
    body:            String,
    topic:           String,
    author:          String,
    created_at:      DateTime<Utc>,
    votes:           i32,
    article_img_url: Option<String>,
    comment_count:   i64,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article::from_db(ArticleRecord {
            id:              ArticleId::from_i32(row.article_id),
            title:           row.title,
            body:            row.body,
            topic:           row.topic,
            author:          row.author,
            created_at:      row.created_at,
            votes:           row.votes,
            article_img_url: row.article_img_url,
            comment_count:   row.comment_count,
        })
    }
}

/// コメント数付きで記事を取得する SELECT 句（GROUP BY まで含まない）
const SELECT_ARTICLE_WITH_COUNT: &str = r#"
    SELECT
        a.article_id, a.title, a.body, a.topic, a.author,
        a.created_at, a.votes, a.article_img_url,
        COUNT(c.comment_id) AS comment_count
    FROM articles a
    LEFT JOIN comments c ON c.article_id = a.article_id
"#;

/// 並び替えキーを ORDER BY に使う列名に変換する
fn sort_column(key: ArticleSortKey) -> &'static str {
    match key {
        ArticleSortKey::ArticleId => "a.article_id",
        ArticleSortKey::Title => "a.title",
        ArticleSortKey::Author => "a.author",
        ArticleSortKey::CreatedAt => "a.created_at",
        ArticleSortKey::Votes => "a.votes",
        ArticleSortKey::CommentCount => "comment_count",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// PostgreSQL 実装の ArticleRepository
#[derive(Debug, Clone)]
pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, InfraError> {
        let sql = format!(
            "{SELECT_ARTICLE_WITH_COUNT} WHERE a.article_id = $1 GROUP BY a.article_id"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Article::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn exists(&self, id: ArticleId) -> Result<bool, InfraError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE article_id = $1)")
                .bind(id.as_i32())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(sort_by = ?query.sort_by, order = ?query.order, topic = ?query.topic)
    )]
    async fn find_page(&self, query: &ArticleListQuery) -> Result<Page<Article>, InfraError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles");
        if let Some(topic) = &query.topic {
            count.push(" WHERE topic = ").push_bind(topic.as_str());
        }
        let total_count: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_ARTICLE_WITH_COUNT);
        if let Some(topic) = &query.topic {
            select.push(" WHERE a.topic = ").push_bind(topic.as_str());
        }
        select
            .push(" GROUP BY a.article_id ORDER BY ")
            .push(sort_column(query.sort_by))
            .push(" ")
            .push(sort_direction(query.order))
            .push(" LIMIT ")
            .push_bind(i64::from(query.pagination.limit()))
            .push(" OFFSET ")
            .push_bind(query.pagination.offset());

        let rows = select
            .build_query_as::<ArticleRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(Article::from).collect(),
            total_count,
        })
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(author = %article.author(), topic = %article.topic())
    )]
    async fn insert(&self, article: &NewArticle) -> Result<Article, InfraError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (author, title, body, topic, article_img_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                article_id, title, body, topic, author,
                created_at, votes, article_img_url,
                0::BIGINT AS comment_count
            "#,
        )
        .bind(article.author())
        .bind(article.title())
        .bind(article.body())
        .bind(article.topic())
        .bind(article.article_img_url())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %delta))]
    async fn add_votes(
        &self,
        id: ArticleId,
        delta: VoteDelta,
    ) -> Result<Option<Article>, InfraError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            WITH updated AS (
                UPDATE articles
                SET votes = votes + $1
                WHERE article_id = $2
                RETURNING *
            )
            SELECT
                u.article_id, u.title, u.body, u.topic, u.author,
                u.created_at, u.votes, u.article_img_url,
                (SELECT COUNT(*) FROM comments c WHERE c.article_id = u.article_id) AS comment_count
            FROM updated u
            "#,
        )
        .bind(delta.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Article::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, tx: &mut TxContext, id: ArticleId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM articles WHERE article_id = $1")
            .bind(id.as_i32())
            .execute(tx.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
