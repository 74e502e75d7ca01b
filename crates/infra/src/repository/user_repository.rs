//! # UserRepository
//!
//! ユーザーの参照を担当するリポジトリ。
//! ユーザーの作成・更新はシードデータで行うため、読み取り操作のみを持つ。

use async_trait::async_trait;
use gazette_domain::user::{User, UserRecord, Username};
use sqlx::PgPool;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 全ユーザーを username 順で取得する
    async fn find_all(&self) -> Result<Vec<User>, InfraError>;

    /// username でユーザーを取得する
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError>;
}

/// DB の users テーブルの行を表す中間構造体
#[derive(sqlx::FromRow)]
struct UserRow {
    username:   String,
    name:       String,
    avatar_url: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_db(UserRecord {
            username:   row.username,
            name:       row.name,
            avatar_url: row.avatar_url,
        })
    }
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT username, name, avatar_url FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%username))]
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, name, avatar_url FROM users WHERE username = $1",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}
