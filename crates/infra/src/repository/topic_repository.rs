//! # TopicRepository
//!
//! トピックの永続化を担当するリポジトリ。

use async_trait::async_trait;
use gazette_domain::topic::{NewTopic, Topic, TopicRecord};
use sqlx::PgPool;

use crate::error::InfraError;

/// トピックリポジトリトレイト
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// 全トピックを slug 順で取得する
    async fn find_all(&self) -> Result<Vec<Topic>, InfraError>;

    /// slug でトピックを取得する
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Topic>, InfraError>;

    /// トピックを作成し、作成された行を返す
    ///
    /// slug が重複する場合は一意制約違反（23505）になる。
    async fn insert(&self, topic: &NewTopic) -> Result<Topic, InfraError>;
}

/// DB の topics テーブルの行を表す中間構造体
#[derive(sqlx::FromRow)]
struct TopicRow {
    slug:        String,
    description: String,
    img_url:     Option<String>,
}

impl From<TopicRow> for Topic {
    fn from(row: TopicRow) -> Self {
        Topic::from_db(TopicRecord {
            slug:        row.slug,
            description: row.description,
            img_url:     row.img_url,
        })
    }
}

/// PostgreSQL 実装の TopicRepository
#[derive(Debug, Clone)]
pub struct PostgresTopicRepository {
    pool: PgPool,
}

impl PostgresTopicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicRepository for PostgresTopicRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Topic>, InfraError> {
        let rows = sqlx::query_as::<_, TopicRow>(
            "SELECT slug, description, img_url FROM topics ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%slug))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Topic>, InfraError> {
        let row = sqlx::query_as::<_, TopicRow>(
            "SELECT slug, description, img_url FROM topics WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Topic::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(slug = %topic.slug()))]
    async fn insert(&self, topic: &NewTopic) -> Result<Topic, InfraError> {
        let row = sqlx::query_as::<_, TopicRow>(
            r#"
            INSERT INTO topics (slug, description, img_url)
            VALUES ($1, $2, $3)
            RETURNING slug, description, img_url
            "#,
        )
        .bind(topic.slug())
        .bind(topic.description())
        .bind(topic.img_url())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
